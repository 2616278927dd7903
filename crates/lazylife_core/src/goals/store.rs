//! Goal storage collaborator contract and an in-memory implementation.
//!
//! # Responsibility
//! - Define the async CRUD surface the goal service writes through.
//! - Provide `InMemoryGoalStore` for the CLI and tests.
//!
//! # Invariants
//! - At most `MAX_YEARLY_GOALS_PER_YEAR` yearly goals per year.
//! - At most one monthly goal per `(year, month)` and one weekly goal per
//!   week start day.
//! - `available_years` lists distinct yearly/monthly years, newest first.

use crate::goals::period::resolve_input_year;
use crate::model::goal::{
    GoalId, GoalInput, GoalKind, GoalsByYear, MonthlyGoal, WeeklyGoal, YearlyGoal,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Yearly goal cap per year.
pub const MAX_YEARLY_GOALS_PER_YEAR: usize = 3;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage collaborator failure. Passed through the service unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound { kind: GoalKind, id: GoalId },
    YearlyLimitReached { year: i32 },
    MonthlyGoalExists { year: i32, month: u32 },
    WeeklyGoalExists { week_start_date: NaiveDate },
    InvalidMonth(u32),
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{} goal not found: {id}", kind.as_str()),
            Self::YearlyLimitReached { year } => write!(
                f,
                "at most {MAX_YEARLY_GOALS_PER_YEAR} yearly goals allowed for {year}"
            ),
            Self::MonthlyGoalExists { year, month } => {
                write!(f, "monthly goal already set for {year}-{month:02}")
            }
            Self::WeeklyGoalExists { week_start_date } => {
                write!(f, "weekly goal already set for week starting {week_start_date}")
            }
            Self::InvalidMonth(month) => write!(f, "month must be 1..=12, got {month}"),
            Self::Backend(message) => write!(f, "goal store failure: {message}"),
        }
    }
}

impl Error for StoreError {}

/// Goal storage operations consumed by the goal service and shard cache.
#[async_trait]
pub trait GoalStore: Send + Sync {
    async fn create(&self, input: &GoalInput) -> StoreResult<GoalId>;
    async fn update(&self, id: GoalId, input: &GoalInput) -> StoreResult<()>;
    async fn delete(&self, kind: GoalKind, id: GoalId) -> StoreResult<()>;
    async fn toggle_achievement(&self, kind: GoalKind, id: GoalId) -> StoreResult<()>;
    async fn list_by_year(&self, year: i32) -> StoreResult<GoalsByYear>;
    async fn available_years(&self) -> StoreResult<Vec<i32>>;
}

#[derive(Default)]
struct GoalTables {
    yearly: Vec<YearlyGoal>,
    monthly: Vec<MonthlyGoal>,
    weekly: Vec<WeeklyGoal>,
}

impl GoalTables {
    fn check_limits(&self, input: &GoalInput, year: i32, exclude: Option<GoalId>) -> StoreResult<()> {
        let is_other = |id: &GoalId| Some(*id) != exclude;
        match input {
            GoalInput::Yearly { .. } => {
                let count = self
                    .yearly
                    .iter()
                    .filter(|goal| goal.year == year && is_other(&goal.id))
                    .count();
                if count >= MAX_YEARLY_GOALS_PER_YEAR {
                    return Err(StoreError::YearlyLimitReached { year });
                }
            }
            GoalInput::Monthly { month, .. } => {
                if !(1..=12).contains(month) {
                    return Err(StoreError::InvalidMonth(*month));
                }
                if self
                    .monthly
                    .iter()
                    .any(|goal| goal.year == year && goal.month == *month && is_other(&goal.id))
                {
                    return Err(StoreError::MonthlyGoalExists {
                        year,
                        month: *month,
                    });
                }
            }
            GoalInput::Weekly {
                week_start_date, ..
            } => {
                if self
                    .weekly
                    .iter()
                    .any(|goal| goal.week_start_date == *week_start_date && is_other(&goal.id))
                {
                    return Err(StoreError::WeeklyGoalExists {
                        week_start_date: *week_start_date,
                    });
                }
            }
        }
        Ok(())
    }

    fn insert(&mut self, id: GoalId, input: &GoalInput, year: i32) {
        match input {
            GoalInput::Yearly {
                title, target_date, ..
            } => self.yearly.push(YearlyGoal {
                id,
                title: title.clone(),
                target_date: *target_date,
                year,
                achieved: false,
            }),
            GoalInput::Monthly {
                title,
                target_date,
                month,
                ..
            } => self.monthly.push(MonthlyGoal {
                id,
                title: title.clone(),
                target_date: *target_date,
                year,
                month: *month,
                achieved: false,
            }),
            GoalInput::Weekly {
                title,
                week_start_date,
                ..
            } => self.weekly.push(WeeklyGoal {
                id,
                title: title.clone(),
                year,
                week_start_date: *week_start_date,
                achieved: false,
            }),
        }
    }

    /// Replaces title and period fields in place, keeping `achieved`.
    fn replace(&mut self, id: GoalId, input: &GoalInput, year: i32) -> bool {
        let replaced = match input {
            GoalInput::Yearly {
                title, target_date, ..
            } => self.yearly.iter_mut().find(|goal| goal.id == id).map(|goal| {
                goal.title = title.clone();
                goal.target_date = *target_date;
                goal.year = year;
            }),
            GoalInput::Monthly {
                title,
                target_date,
                month,
                ..
            } => self.monthly.iter_mut().find(|goal| goal.id == id).map(|goal| {
                goal.title = title.clone();
                goal.target_date = *target_date;
                goal.year = year;
                goal.month = *month;
            }),
            GoalInput::Weekly {
                title,
                week_start_date,
                ..
            } => self.weekly.iter_mut().find(|goal| goal.id == id).map(|goal| {
                goal.title = title.clone();
                goal.year = year;
                goal.week_start_date = *week_start_date;
            }),
        };
        replaced.is_some()
    }

    fn achieved_flag(&mut self, kind: GoalKind, id: GoalId) -> Option<&mut bool> {
        match kind {
            GoalKind::Yearly => self
                .yearly
                .iter_mut()
                .find(|goal| goal.id == id)
                .map(|goal| &mut goal.achieved),
            GoalKind::Monthly => self
                .monthly
                .iter_mut()
                .find(|goal| goal.id == id)
                .map(|goal| &mut goal.achieved),
            GoalKind::Weekly => self
                .weekly
                .iter_mut()
                .find(|goal| goal.id == id)
                .map(|goal| &mut goal.achieved),
        }
    }

    fn remove(&mut self, kind: GoalKind, id: GoalId) -> bool {
        let before = self.len();
        match kind {
            GoalKind::Yearly => self.yearly.retain(|goal| goal.id != id),
            GoalKind::Monthly => self.monthly.retain(|goal| goal.id != id),
            GoalKind::Weekly => self.weekly.retain(|goal| goal.id != id),
        }
        self.len() != before
    }

    fn len(&self) -> usize {
        self.yearly.len() + self.monthly.len() + self.weekly.len()
    }
}

/// Process-local goal store.
///
/// Goals are listed under the year resolved from their payload. Payloads
/// without any period field are stored under `default_year`; `GoalService`
/// pins such payloads to the viewed year before they reach the store.
pub struct InMemoryGoalStore {
    default_year: i32,
    tables: RwLock<GoalTables>,
}

impl InMemoryGoalStore {
    pub fn new(default_year: i32) -> Self {
        Self {
            default_year,
            tables: RwLock::new(GoalTables::default()),
        }
    }
}

#[async_trait]
impl GoalStore for InMemoryGoalStore {
    async fn create(&self, input: &GoalInput) -> StoreResult<GoalId> {
        let year = resolve_input_year(input, self.default_year);
        let mut tables = self.tables.write().await;
        tables.check_limits(input, year, None)?;

        let id = Uuid::new_v4();
        tables.insert(id, input, year);
        Ok(id)
    }

    async fn update(&self, id: GoalId, input: &GoalInput) -> StoreResult<()> {
        let year = resolve_input_year(input, self.default_year);
        let mut tables = self.tables.write().await;
        tables.check_limits(input, year, Some(id))?;

        if !tables.replace(id, input, year) {
            return Err(StoreError::NotFound {
                kind: input.kind(),
                id,
            });
        }
        Ok(())
    }

    async fn delete(&self, kind: GoalKind, id: GoalId) -> StoreResult<()> {
        if !self.tables.write().await.remove(kind, id) {
            return Err(StoreError::NotFound { kind, id });
        }
        Ok(())
    }

    async fn toggle_achievement(&self, kind: GoalKind, id: GoalId) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let achieved = tables
            .achieved_flag(kind, id)
            .ok_or(StoreError::NotFound { kind, id })?;
        *achieved = !*achieved;
        Ok(())
    }

    async fn list_by_year(&self, year: i32) -> StoreResult<GoalsByYear> {
        let tables = self.tables.read().await;

        let yearly_goals = tables
            .yearly
            .iter()
            .filter(|goal| goal.year == year)
            .cloned()
            .collect();

        let mut monthly_goals: Vec<MonthlyGoal> = tables
            .monthly
            .iter()
            .filter(|goal| goal.year == year)
            .cloned()
            .collect();
        monthly_goals.sort_by_key(|goal| goal.month);

        let mut weekly_goals: Vec<WeeklyGoal> = tables
            .weekly
            .iter()
            .filter(|goal| goal.year == year)
            .cloned()
            .collect();
        weekly_goals.sort_by_key(|goal| goal.week_start_date);

        Ok(GoalsByYear {
            yearly_goals,
            monthly_goals,
            weekly_goals,
        })
    }

    async fn available_years(&self) -> StoreResult<Vec<i32>> {
        let tables = self.tables.read().await;
        let years: BTreeSet<i32> = tables
            .yearly
            .iter()
            .map(|goal| goal.year)
            .chain(tables.monthly.iter().map(|goal| goal.year))
            .collect();
        Ok(years.into_iter().rev().collect())
    }
}
