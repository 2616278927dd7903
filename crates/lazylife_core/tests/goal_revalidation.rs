use async_trait::async_trait;
use chrono::NaiveDate;
use lazylife_core::{
    GoalInput, GoalKind, GoalWrite, RevalidationFailure, RevalidationPort, ShardKey,
    ShardRevalidationCoordinator,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;
use uuid::Uuid;

/// Records every invalidation and fails the configured shards.
#[derive(Default)]
struct RecordingPort {
    calls: Mutex<Vec<ShardKey>>,
    failing: Vec<ShardKey>,
}

impl RecordingPort {
    fn failing_on(shards: &[ShardKey]) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failing: shards.to_vec(),
        }
    }

    fn calls(&self) -> Vec<ShardKey> {
        self.calls.lock().unwrap().clone()
    }

    fn count(&self, shard: ShardKey) -> usize {
        self.calls().into_iter().filter(|call| *call == shard).count()
    }
}

#[async_trait]
impl RevalidationPort for RecordingPort {
    async fn invalidate(&self, shard: &ShardKey) -> Result<(), RevalidationFailure> {
        self.calls.lock().unwrap().push(*shard);
        if self.failing.contains(shard) {
            return Err(RevalidationFailure::new(*shard, "fetch failed"));
        }
        Ok(())
    }
}

fn coordinator(port: &Arc<RecordingPort>) -> ShardRevalidationCoordinator {
    ShardRevalidationCoordinator::new(port.clone())
}

#[tokio::test]
async fn create_in_other_year_refreshes_owning_and_viewed_year() {
    let port = Arc::new(RecordingPort::default());
    let write = GoalWrite::Create(GoalInput::yearly("learn piano", 2025));

    coordinator(&port).revalidate_after(&write, 2024).await.unwrap();

    assert_eq!(port.count(ShardKey::Goals { year: 2025 }), 1);
    assert_eq!(port.count(ShardKey::Goals { year: 2024 }), 1);
}

#[tokio::test]
async fn create_in_viewed_year_refreshes_it_exactly_once() {
    let port = Arc::new(RecordingPort::default());
    let write = GoalWrite::Create(GoalInput::monthly("save 10%", 2024, 7));

    let refreshed = coordinator(&port).revalidate_after(&write, 2024).await.unwrap();

    assert_eq!(port.count(ShardKey::Goals { year: 2024 }), 1);
    assert_eq!(
        refreshed,
        vec![ShardKey::Goals { year: 2024 }, ShardKey::AvailableYears]
    );
}

#[tokio::test]
async fn update_moving_goal_out_of_viewed_year_refreshes_both() {
    let port = Arc::new(RecordingPort::default());
    let write = GoalWrite::Update {
        id: Uuid::new_v4(),
        input: GoalInput::weekly("week one", NaiveDate::from_ymd_opt(2023, 12, 25).unwrap()),
    };

    coordinator(&port).revalidate_after(&write, 2024).await.unwrap();

    assert_eq!(port.count(ShardKey::Goals { year: 2023 }), 1);
    assert_eq!(port.count(ShardKey::Goals { year: 2024 }), 1);
}

#[tokio::test]
async fn delete_refreshes_only_viewed_year_leaving_owning_year_stale() {
    let port = Arc::new(RecordingPort::default());
    // The deleted goal belongs to 2023, but delete carries only its id.
    let write = GoalWrite::Delete {
        kind: GoalKind::Yearly,
        id: Uuid::new_v4(),
    };

    coordinator(&port).revalidate_after(&write, 2024).await.unwrap();

    assert_eq!(port.count(ShardKey::Goals { year: 2024 }), 1);
    assert_eq!(port.count(ShardKey::Goals { year: 2023 }), 0);
    assert_eq!(port.count(ShardKey::AvailableYears), 1);
}

#[tokio::test]
async fn toggle_refreshes_only_viewed_year() {
    let port = Arc::new(RecordingPort::default());
    let write = GoalWrite::Toggle {
        kind: GoalKind::Monthly,
        id: Uuid::new_v4(),
    };

    coordinator(&port).revalidate_after(&write, 2024).await.unwrap();

    assert_eq!(port.calls(), vec![ShardKey::Goals { year: 2024 }]);
}

#[tokio::test]
async fn failed_refresh_rejects_but_keeps_sibling_refreshes() {
    let port = Arc::new(RecordingPort::failing_on(&[ShardKey::Goals { year: 2025 }]));
    let write = GoalWrite::Create(GoalInput::yearly("move abroad", 2025));

    let err = coordinator(&port)
        .revalidate_after(&write, 2024)
        .await
        .unwrap_err();

    assert_eq!(port.calls().len(), 3);
    assert_eq!(err.failed.len(), 1);
    assert_eq!(err.failed[0].shard, ShardKey::Goals { year: 2025 });
    assert_eq!(
        err.refreshed,
        vec![ShardKey::AvailableYears, ShardKey::Goals { year: 2024 }]
    );
    assert!(err.to_string().contains("goals:2025"));
}

/// Blocks each invalidation until every planned one has started.
struct RendezvousPort {
    barrier: Barrier,
}

#[async_trait]
impl RevalidationPort for RendezvousPort {
    async fn invalidate(&self, _shard: &ShardKey) -> Result<(), RevalidationFailure> {
        self.barrier.wait().await;
        Ok(())
    }
}

#[tokio::test]
async fn invalidations_are_issued_concurrently() {
    let write = GoalWrite::Create(GoalInput::yearly("run a marathon", 2025));
    let port = Arc::new(RendezvousPort {
        barrier: Barrier::new(3),
    });
    let coordinator = ShardRevalidationCoordinator::new(port);

    let refreshed = tokio::time::timeout(
        Duration::from_secs(5),
        coordinator.revalidate_after(&write, 2024),
    )
    .await
    .expect("sequential invalidation would never pass the barrier")
    .unwrap();
    assert_eq!(refreshed.len(), 3);
}
