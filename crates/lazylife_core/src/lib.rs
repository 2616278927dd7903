//! Core logic for the LazyLife task/event/goal screens.
//!
//! - `temporal`: calendar-day classification and list grouping.
//! - `goals`: year-sharded goal writes and cache revalidation.

pub mod config;
pub mod goals;
pub mod logging;
pub mod model;
pub mod temporal;

pub use config::{ConfigError, ConfigResult, CoreConfig};
pub use goals::period::{resolve_input_year, resolve_year, PeriodAnchor, PeriodRecord};
pub use goals::revalidation::{
    plan_invalidation, GoalWrite, RevalidationError, RevalidationFailure, RevalidationPort,
    ShardKey, ShardRevalidationCoordinator, WriteOperation,
};
pub use goals::service::{GoalService, GoalWriteError, GoalWriteOutcome};
pub use goals::shard_cache::ShardCache;
pub use goals::store::{GoalStore, InMemoryGoalStore, StoreError, StoreResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::event::{Event, EventCategory, EventValidationError};
pub use model::goal::{GoalId, GoalInput, GoalKind, GoalsByYear, MonthlyGoal, WeeklyGoal, YearlyGoal};
pub use model::task::Task;
pub use model::RecordId;
pub use temporal::classifier::{classify, date_key, Category, DayAnchor, DATE_KEY_FORMAT};
pub use temporal::grouping::{
    build_event_groups, build_task_groups, today_tasks, DatedRecord, Group, GroupKey,
    ScheduledRecord,
};
pub use temporal::titles::{
    date_label, DateLabel, EnglishTitles, GroupTitleFormatter, JapaneseTitles, RecordKind,
    TitleLocale,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
