//! Shard invalidation planning and concurrent revalidation.
//!
//! # Responsibility
//! - Decide which cache shards a goal write makes stale.
//! - Issue all refreshes through `RevalidationPort` concurrently and wait for
//!   every one to settle.
//!
//! # Invariants
//! - Create/update refresh the payload's owning year, plus the viewed year
//!   when it differs. A shard is never listed twice.
//! - Delete/toggle carry no period payload and refresh only the viewed year.
//!   A goal owned by another year leaves that year's shard stale.
//! - The available-years listing is refreshed on every write except
//!   achievement toggles.
//! - No rollback: shards refreshed before a sibling failure stay refreshed.

use crate::goals::period::resolve_input_year;
use crate::model::goal::{GoalId, GoalInput, GoalKind};
use async_trait::async_trait;
use futures::future::join_all;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Cache key of the available-years listing.
pub const AVAILABLE_YEARS_KEY: &str = "available-years";

/// Addressable cache partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShardKey {
    /// Goals owned by one calendar year.
    Goals { year: i32 },
    /// Distinct years that have at least one yearly or monthly goal.
    AvailableYears,
}

impl Display for ShardKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Goals { year } => write!(f, "goals:{year}"),
            Self::AvailableYears => f.write_str(AVAILABLE_YEARS_KEY),
        }
    }
}

/// One shard refresh that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevalidationFailure {
    pub shard: ShardKey,
    pub message: String,
}

impl RevalidationFailure {
    pub fn new(shard: ShardKey, message: impl Into<String>) -> Self {
        Self {
            shard,
            message: message.into(),
        }
    }
}

impl Display for RevalidationFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to revalidate `{}`: {}", self.shard, self.message)
    }
}

impl Error for RevalidationFailure {}

/// Coordinated revalidation that left at least one shard stale.
///
/// `refreshed` lists shards that did refresh; the write is partially applied
/// from the cache's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevalidationError {
    pub refreshed: Vec<ShardKey>,
    pub failed: Vec<RevalidationFailure>,
}

impl Display for RevalidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} shard refreshes failed",
            self.failed.len(),
            self.failed.len() + self.refreshed.len()
        )?;
        if let Some(first) = self.failed.first() {
            write!(f, "; first: {first}")?;
        }
        Ok(())
    }
}

impl Error for RevalidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.failed.first().map(|failure| failure as &(dyn Error + 'static))
    }
}

/// Marks a shard stale and triggers its refetch.
///
/// Implementations own the cached data; calls may run concurrently.
#[async_trait]
pub trait RevalidationPort: Send + Sync {
    async fn invalidate(&self, shard: &ShardKey) -> Result<(), RevalidationFailure>;
}

/// Kind of goal write, for logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOperation {
    Create,
    Update,
    Delete,
    Toggle,
}

impl WriteOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Toggle => "toggle",
        }
    }
}

/// One goal write together with what the caller knows about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalWrite {
    Create(GoalInput),
    Update { id: GoalId, input: GoalInput },
    Delete { kind: GoalKind, id: GoalId },
    /// Flip the `achieved` flag.
    Toggle { kind: GoalKind, id: GoalId },
}

impl GoalWrite {
    pub fn operation(&self) -> WriteOperation {
        match self {
            Self::Create(_) => WriteOperation::Create,
            Self::Update { .. } => WriteOperation::Update,
            Self::Delete { .. } => WriteOperation::Delete,
            Self::Toggle { .. } => WriteOperation::Toggle,
        }
    }

    pub fn kind(&self) -> GoalKind {
        match self {
            Self::Create(input) | Self::Update { input, .. } => input.kind(),
            Self::Delete { kind, .. } | Self::Toggle { kind, .. } => *kind,
        }
    }

    /// Pins a create/update payload without any period field to
    /// `fallback_year`, so the store and the refresh plan agree on its shard.
    pub fn with_year_fallback(self, fallback_year: i32) -> Self {
        match self {
            Self::Create(input) => Self::Create(input.with_year_fallback(fallback_year)),
            Self::Update { id, input } => Self::Update {
                id,
                input: input.with_year_fallback(fallback_year),
            },
            other => other,
        }
    }
}

/// Lists the shards made stale by `write` while `viewed_year` is displayed.
///
/// Order is the issue order: owning year first, then available years, then
/// the viewed year when it differs.
pub fn plan_invalidation(write: &GoalWrite, viewed_year: i32) -> Vec<ShardKey> {
    let viewed = ShardKey::Goals { year: viewed_year };
    match write {
        GoalWrite::Create(input) | GoalWrite::Update { input, .. } => {
            let owning_year = resolve_input_year(input, viewed_year);
            let mut shards = vec![ShardKey::Goals { year: owning_year }, ShardKey::AvailableYears];
            if owning_year != viewed_year {
                shards.push(viewed);
            }
            shards
        }
        GoalWrite::Delete { .. } => vec![viewed, ShardKey::AvailableYears],
        GoalWrite::Toggle { .. } => vec![viewed],
    }
}

/// Issues shard refreshes through a `RevalidationPort`.
#[derive(Clone)]
pub struct ShardRevalidationCoordinator {
    port: Arc<dyn RevalidationPort>,
}

impl ShardRevalidationCoordinator {
    pub fn new(port: Arc<dyn RevalidationPort>) -> Self {
        Self { port }
    }

    /// Refreshes every shard concurrently and waits for all of them.
    ///
    /// Returns the refreshed shards, or a `RevalidationError` when any refresh
    /// failed. Successful refreshes are not rolled back.
    pub async fn revalidate(&self, shards: &[ShardKey]) -> Result<Vec<ShardKey>, RevalidationError> {
        let outcomes = join_all(shards.iter().map(|shard| async move {
            (*shard, self.port.invalidate(shard).await)
        }))
        .await;

        let mut refreshed = Vec::with_capacity(outcomes.len());
        let mut failed = Vec::new();
        for (shard, outcome) in outcomes {
            match outcome {
                Ok(()) => refreshed.push(shard),
                Err(failure) => {
                    warn!(
                        "event=shard_revalidate module=goals status=error shard={} message={}",
                        shard, failure.message
                    );
                    failed.push(failure);
                }
            }
        }

        if failed.is_empty() {
            Ok(refreshed)
        } else {
            Err(RevalidationError { refreshed, failed })
        }
    }

    /// Plans and issues the refreshes that follow `write`.
    pub async fn revalidate_after(
        &self,
        write: &GoalWrite,
        viewed_year: i32,
    ) -> Result<Vec<ShardKey>, RevalidationError> {
        let plan = plan_invalidation(write, viewed_year);
        let refreshed = self.revalidate(&plan).await?;
        info!(
            "event=shard_revalidate module=goals status=ok op={} kind={} viewed_year={} shards={}",
            write.operation().as_str(),
            write.kind().as_str(),
            viewed_year,
            refreshed.len()
        );
        Ok(refreshed)
    }
}

#[cfg(test)]
mod tests {
    use super::{plan_invalidation, GoalWrite, ShardKey};
    use crate::model::goal::{GoalInput, GoalKind};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn create_in_other_year_plans_owning_and_viewed_shards() {
        let plan = plan_invalidation(&GoalWrite::Create(GoalInput::yearly("a", 2025)), 2024);
        assert_eq!(
            plan,
            vec![
                ShardKey::Goals { year: 2025 },
                ShardKey::AvailableYears,
                ShardKey::Goals { year: 2024 },
            ]
        );
    }

    #[test]
    fn update_in_viewed_year_plans_viewed_shard_once() {
        let write = GoalWrite::Update {
            id: Uuid::new_v4(),
            input: GoalInput::monthly("m", 2024, 3),
        };
        let plan = plan_invalidation(&write, 2024);
        let viewed = plan
            .iter()
            .filter(|shard| **shard == ShardKey::Goals { year: 2024 })
            .count();
        assert_eq!(viewed, 1);
    }

    #[test]
    fn weekly_create_owns_week_start_year() {
        let week = NaiveDate::from_ymd_opt(2024, 12, 30).unwrap();
        let plan = plan_invalidation(&GoalWrite::Create(GoalInput::weekly("w", week)), 2025);
        assert_eq!(plan[0], ShardKey::Goals { year: 2024 });
        assert!(plan.contains(&ShardKey::Goals { year: 2025 }));
    }

    #[test]
    fn toggle_plans_only_viewed_shard() {
        let write = GoalWrite::Toggle {
            kind: GoalKind::Yearly,
            id: Uuid::new_v4(),
        };
        assert_eq!(plan_invalidation(&write, 2024), vec![ShardKey::Goals { year: 2024 }]);
    }

    #[test]
    fn shard_keys_render_as_cache_keys() {
        assert_eq!(ShardKey::Goals { year: 2024 }.to_string(), "goals:2024");
        assert_eq!(ShardKey::AvailableYears.to_string(), "available-years");
    }
}
