//! Yearly, monthly and weekly goal records plus their write payloads.
//!
//! # Invariants
//! - Yearly and monthly goals carry an explicit `year`.
//! - Weekly goals carry `week_start_date` and the `year` they are listed
//!   under; unless a payload names a year explicitly, that year is the
//!   calendar year of the week start (see `goals::period`).
//! - `month` is 1-based.

use crate::model::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable goal identifier.
pub type GoalId = RecordId;

/// Goal granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    Yearly,
    Monthly,
    Weekly,
}

impl GoalKind {
    /// Stable lowercase name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyGoal {
    pub id: GoalId,
    pub title: String,
    pub target_date: Option<NaiveDate>,
    pub year: i32,
    #[serde(default)]
    pub achieved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyGoal {
    pub id: GoalId,
    pub title: String,
    pub target_date: Option<NaiveDate>,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub achieved: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyGoal {
    pub id: GoalId,
    pub title: String,
    /// Year shard the goal is listed under.
    pub year: i32,
    /// First day of the goal's week.
    pub week_start_date: NaiveDate,
    #[serde(default)]
    pub achieved: bool,
}

/// Create/update payload for one goal.
///
/// Updates use full replacement semantics: the payload replaces title and
/// period fields of the stored goal of the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GoalInput {
    #[serde(rename_all = "camelCase")]
    Yearly {
        title: String,
        #[serde(default)]
        target_date: Option<NaiveDate>,
        #[serde(default)]
        year: Option<i32>,
    },
    #[serde(rename_all = "camelCase")]
    Monthly {
        title: String,
        #[serde(default)]
        target_date: Option<NaiveDate>,
        #[serde(default)]
        year: Option<i32>,
        month: u32,
    },
    #[serde(rename_all = "camelCase")]
    Weekly {
        title: String,
        week_start_date: NaiveDate,
        #[serde(default)]
        year: Option<i32>,
    },
}

impl GoalInput {
    /// Yearly payload with an explicit year.
    pub fn yearly(title: impl Into<String>, year: i32) -> Self {
        Self::Yearly {
            title: title.into(),
            target_date: None,
            year: Some(year),
        }
    }

    /// Monthly payload with an explicit year.
    pub fn monthly(title: impl Into<String>, year: i32, month: u32) -> Self {
        Self::Monthly {
            title: title.into(),
            target_date: None,
            year: Some(year),
            month,
        }
    }

    /// Weekly payload anchored on `week_start_date`.
    pub fn weekly(title: impl Into<String>, week_start_date: NaiveDate) -> Self {
        Self::Weekly {
            title: title.into(),
            week_start_date,
            year: None,
        }
    }

    /// Returns the payload with an explicit year when it carries no period
    /// field of its own; otherwise returns it unchanged.
    pub fn with_year_fallback(mut self, fallback_year: i32) -> Self {
        if self.period_anchor().is_none() {
            if let Self::Yearly { year, .. } | Self::Monthly { year, .. } = &mut self {
                *year = Some(fallback_year);
            }
        }
        self
    }

    pub fn kind(&self) -> GoalKind {
        match self {
            Self::Yearly { .. } => GoalKind::Yearly,
            Self::Monthly { .. } => GoalKind::Monthly,
            Self::Weekly { .. } => GoalKind::Weekly,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Yearly { title, .. } | Self::Monthly { title, .. } | Self::Weekly { title, .. } => {
                title
            }
        }
    }
}

/// All goals belonging to one year shard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalsByYear {
    pub yearly_goals: Vec<YearlyGoal>,
    pub monthly_goals: Vec<MonthlyGoal>,
    pub weekly_goals: Vec<WeeklyGoal>,
}

impl GoalsByYear {
    pub fn is_empty(&self) -> bool {
        self.yearly_goals.is_empty() && self.monthly_goals.is_empty() && self.weekly_goals.is_empty()
    }

    pub fn len(&self) -> usize {
        self.yearly_goals.len() + self.monthly_goals.len() + self.weekly_goals.len()
    }
}
