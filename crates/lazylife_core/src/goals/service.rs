//! Goal write use-cases: store write followed by coordinated revalidation.
//!
//! # Responsibility
//! - Write through the storage collaborator.
//! - Refresh the shards the write made stale, relative to the viewed year.
//!
//! # Invariants
//! - A payload without any period field is pinned to the viewed year before
//!   the store write, so it is stored in a shard the refresh plan covers.
//! - Store errors are returned unchanged and skip revalidation.
//! - A write completes only after every issued shard refresh has settled.
//! - A revalidation failure after a successful store write is reported as
//!   `GoalWriteError::Revalidation`; the store write itself is kept.

use crate::goals::revalidation::{
    GoalWrite, RevalidationError, RevalidationPort, ShardKey, ShardRevalidationCoordinator,
};
use crate::goals::store::{GoalStore, StoreError};
use crate::model::goal::{GoalId, GoalInput, GoalKind};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Failure of a coordinated goal write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalWriteError {
    /// The store rejected the write; nothing was revalidated.
    Store(StoreError),
    /// The write was stored but at least one shard may still be stale.
    Revalidation {
        created_id: Option<GoalId>,
        source: RevalidationError,
    },
}

impl Display for GoalWriteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Revalidation { source, .. } => {
                write!(f, "goal saved but cached views may be stale: {source}")
            }
        }
    }
}

impl Error for GoalWriteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Revalidation { source, .. } => Some(source),
        }
    }
}

impl From<StoreError> for GoalWriteError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of a coordinated goal write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalWriteOutcome {
    /// Set for creates.
    pub created_id: Option<GoalId>,
    /// Shards refreshed after the write, in plan order.
    pub refreshed: Vec<ShardKey>,
}

/// Goal use-case service over a store and a revalidation port.
pub struct GoalService<S: GoalStore> {
    store: Arc<S>,
    coordinator: ShardRevalidationCoordinator,
}

impl<S: GoalStore> GoalService<S> {
    pub fn new(store: Arc<S>, port: Arc<dyn RevalidationPort>) -> Self {
        Self {
            store,
            coordinator: ShardRevalidationCoordinator::new(port),
        }
    }

    /// Applies `write` to the store, then refreshes the affected shards.
    ///
    /// `viewed_year` is the year currently displayed by the caller.
    pub async fn coordinate_goal_write(
        &self,
        write: GoalWrite,
        viewed_year: i32,
    ) -> Result<GoalWriteOutcome, GoalWriteError> {
        let write = write.with_year_fallback(viewed_year);
        let operation = write.operation().as_str();
        let kind = write.kind().as_str();

        let created_id = self.apply(&write).await.map_err(|err| {
            error!(
                "event=goal_write module=goals status=error op={operation} kind={kind} error={err}"
            );
            GoalWriteError::Store(err)
        })?;

        let refreshed = self
            .coordinator
            .revalidate_after(&write, viewed_year)
            .await
            .map_err(|source| {
                error!(
                    "event=goal_write module=goals status=partial op={operation} kind={kind} failed_shards={}",
                    source.failed.len()
                );
                GoalWriteError::Revalidation { created_id, source }
            })?;

        info!("event=goal_write module=goals status=ok op={operation} kind={kind} viewed_year={viewed_year}");
        Ok(GoalWriteOutcome {
            created_id,
            refreshed,
        })
    }

    pub async fn create_goal(
        &self,
        input: GoalInput,
        viewed_year: i32,
    ) -> Result<GoalWriteOutcome, GoalWriteError> {
        self.coordinate_goal_write(GoalWrite::Create(input), viewed_year)
            .await
    }

    pub async fn update_goal(
        &self,
        id: GoalId,
        input: GoalInput,
        viewed_year: i32,
    ) -> Result<GoalWriteOutcome, GoalWriteError> {
        self.coordinate_goal_write(GoalWrite::Update { id, input }, viewed_year)
            .await
    }

    pub async fn delete_goal(
        &self,
        kind: GoalKind,
        id: GoalId,
        viewed_year: i32,
    ) -> Result<GoalWriteOutcome, GoalWriteError> {
        self.coordinate_goal_write(GoalWrite::Delete { kind, id }, viewed_year)
            .await
    }

    pub async fn toggle_goal_achievement(
        &self,
        kind: GoalKind,
        id: GoalId,
        viewed_year: i32,
    ) -> Result<GoalWriteOutcome, GoalWriteError> {
        self.coordinate_goal_write(GoalWrite::Toggle { kind, id }, viewed_year)
            .await
    }

    /// Manual refresh of the viewed year, e.g. after a partial failure.
    pub async fn refresh_goals(&self, viewed_year: i32) -> Result<(), RevalidationError> {
        self.coordinator
            .revalidate(&[ShardKey::Goals { year: viewed_year }])
            .await
            .map(|_| ())
    }

    async fn apply(&self, write: &GoalWrite) -> Result<Option<GoalId>, StoreError> {
        match write {
            GoalWrite::Create(input) => self.store.create(input).await.map(Some),
            GoalWrite::Update { id, input } => self.store.update(*id, input).await.map(|_| None),
            GoalWrite::Delete { kind, id } => self.store.delete(*kind, *id).await.map(|_| None),
            GoalWrite::Toggle { kind, id } => self
                .store
                .toggle_achievement(*kind, *id)
                .await
                .map(|_| None),
        }
    }
}
