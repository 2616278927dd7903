//! Year-sharded goal cache backed by a `GoalStore`.
//!
//! # Invariants
//! - A shard becomes resident on its first read; there is no explicit
//!   creation or destruction.
//! - `invalidate` refetches resident shards only. A shard that was never read
//!   has nothing to refresh and will be fetched on demand.
//! - A failed refetch evicts the shard so the next read goes to the store.
//! - A first read holds the shard's write lock across its store fetch, so a
//!   concurrent `invalidate` waits for it and then refetches instead of
//!   skipping a shard that is about to become resident.

use crate::goals::revalidation::{RevalidationFailure, RevalidationPort, ShardKey};
use crate::goals::store::{GoalStore, StoreResult};
use crate::model::goal::GoalsByYear;
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Cached goal listings keyed by year, plus the available-years listing.
pub struct ShardCache<S: GoalStore> {
    store: Arc<S>,
    goals: RwLock<HashMap<i32, GoalsByYear>>,
    available_years: RwLock<Option<Vec<i32>>>,
}

impl<S: GoalStore> ShardCache<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            goals: RwLock::new(HashMap::new()),
            available_years: RwLock::new(None),
        }
    }

    /// Returns the goals shard for `year`, fetching it on first read.
    pub async fn goals(&self, year: i32) -> StoreResult<GoalsByYear> {
        if let Some(cached) = self.goals.read().await.get(&year) {
            return Ok(cached.clone());
        }

        let mut shards = self.goals.write().await;
        if let Some(cached) = shards.get(&year) {
            return Ok(cached.clone());
        }
        let fresh = self.store.list_by_year(year).await?;
        shards.insert(year, fresh.clone());
        Ok(fresh)
    }

    /// Returns the available-years listing, fetching it on first read.
    pub async fn available_years(&self) -> StoreResult<Vec<i32>> {
        if let Some(cached) = self.available_years.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let mut listing = self.available_years.write().await;
        if let Some(cached) = listing.as_ref() {
            return Ok(cached.clone());
        }
        let fresh = self.store.available_years().await?;
        *listing = Some(fresh.clone());
        Ok(fresh)
    }

    /// Returns whether `shard` currently holds cached data.
    pub async fn is_resident(&self, shard: &ShardKey) -> bool {
        match shard {
            ShardKey::Goals { year } => self.goals.read().await.contains_key(year),
            ShardKey::AvailableYears => self.available_years.read().await.is_some(),
        }
    }

    async fn refetch(&self, shard: &ShardKey) -> StoreResult<()> {
        match shard {
            ShardKey::Goals { year } => match self.store.list_by_year(*year).await {
                Ok(fresh) => {
                    self.goals.write().await.insert(*year, fresh);
                    Ok(())
                }
                Err(err) => {
                    self.goals.write().await.remove(year);
                    Err(err)
                }
            },
            ShardKey::AvailableYears => match self.store.available_years().await {
                Ok(fresh) => {
                    *self.available_years.write().await = Some(fresh);
                    Ok(())
                }
                Err(err) => {
                    *self.available_years.write().await = None;
                    Err(err)
                }
            },
        }
    }
}

#[async_trait]
impl<S: GoalStore + 'static> RevalidationPort for ShardCache<S> {
    async fn invalidate(&self, shard: &ShardKey) -> Result<(), RevalidationFailure> {
        if !self.is_resident(shard).await {
            debug!("event=shard_invalidate module=goals status=skipped shard={shard} reason=not_resident");
            return Ok(());
        }

        self.refetch(shard)
            .await
            .map_err(|err| RevalidationFailure::new(*shard, err.to_string()))?;
        debug!("event=shard_invalidate module=goals status=ok shard={shard}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::ShardCache;
    use crate::goals::revalidation::{RevalidationPort, ShardKey};
    use crate::goals::store::{GoalStore, InMemoryGoalStore, StoreResult};
    use crate::model::goal::{GoalId, GoalInput, GoalKind, GoalsByYear};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Store whose first `list_by_year` snapshots the data, then parks until
    /// `release` is notified.
    struct ParkedStore {
        inner: InMemoryGoalStore,
        park_next_list: AtomicBool,
        listed: Notify,
        release: Notify,
    }

    impl ParkedStore {
        fn new(default_year: i32) -> Self {
            Self {
                inner: InMemoryGoalStore::new(default_year),
                park_next_list: AtomicBool::new(true),
                listed: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl GoalStore for ParkedStore {
        async fn create(&self, input: &GoalInput) -> StoreResult<GoalId> {
            self.inner.create(input).await
        }

        async fn update(&self, id: GoalId, input: &GoalInput) -> StoreResult<()> {
            self.inner.update(id, input).await
        }

        async fn delete(&self, kind: GoalKind, id: GoalId) -> StoreResult<()> {
            self.inner.delete(kind, id).await
        }

        async fn toggle_achievement(&self, kind: GoalKind, id: GoalId) -> StoreResult<()> {
            self.inner.toggle_achievement(kind, id).await
        }

        async fn list_by_year(&self, year: i32) -> StoreResult<GoalsByYear> {
            let snapshot = self.inner.list_by_year(year).await;
            if self.park_next_list.swap(false, Ordering::SeqCst) {
                self.listed.notify_one();
                self.release.notified().await;
            }
            snapshot
        }

        async fn available_years(&self) -> StoreResult<Vec<i32>> {
            self.inner.available_years().await
        }
    }

    #[tokio::test]
    async fn invalidate_refetches_resident_shard() {
        let store = Arc::new(InMemoryGoalStore::new(2024));
        let cache = ShardCache::new(Arc::clone(&store));
        assert!(cache.goals(2024).await.unwrap().is_empty());

        store.create(&GoalInput::yearly("run", 2024)).await.unwrap();
        assert!(cache.goals(2024).await.unwrap().is_empty());

        cache
            .invalidate(&ShardKey::Goals { year: 2024 })
            .await
            .unwrap();
        assert_eq!(cache.goals(2024).await.unwrap().yearly_goals.len(), 1);
    }

    #[tokio::test]
    async fn invalidate_skips_shard_never_read() {
        let store = Arc::new(InMemoryGoalStore::new(2024));
        let cache = ShardCache::new(store);

        cache.invalidate(&ShardKey::AvailableYears).await.unwrap();
        assert!(!cache.is_resident(&ShardKey::AvailableYears).await);
    }

    #[tokio::test]
    async fn invalidate_during_first_read_does_not_leave_stale_shard() {
        let store = Arc::new(ParkedStore::new(2024));
        let cache = ShardCache::new(Arc::clone(&store));

        let (first_read, invalidated) = tokio::join!(cache.goals(2024), async {
            store.listed.notified().await;
            store
                .create(&GoalInput::yearly("swim", 2024))
                .await
                .unwrap();
            let (invalidated, ()) = tokio::join!(
                cache.invalidate(&ShardKey::Goals { year: 2024 }),
                async { store.release.notify_one() }
            );
            invalidated
        });

        assert!(first_read.unwrap().is_empty());
        invalidated.unwrap();
        assert_eq!(cache.goals(2024).await.unwrap().yearly_goals.len(), 1);
    }
}
