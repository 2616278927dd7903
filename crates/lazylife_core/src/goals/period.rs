//! Owning-year resolution for goal records.
//!
//! # Invariants
//! - Yearly/monthly goals own their explicit `year`.
//! - Weekly goals own the calendar year of `week_start_date` (not the ISO
//!   week-numbering year): a week starting `2024-12-30` belongs to 2024.
//!   A weekly write payload may override that with an explicit `year`.
//! - Resolution is pure and never consults external state.

use crate::model::goal::{GoalInput, MonthlyGoal, WeeklyGoal, YearlyGoal};
use chrono::{Datelike, NaiveDate};

/// Field a goal's year is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodAnchor {
    Year(i32),
    WeekStart(NaiveDate),
}

impl PeriodAnchor {
    pub fn year(self) -> i32 {
        match self {
            Self::Year(year) => year,
            Self::WeekStart(date) => date.year(),
        }
    }
}

/// Stored goal with a derivable owning year.
pub trait PeriodRecord {
    fn period_anchor(&self) -> PeriodAnchor;
}

impl PeriodRecord for YearlyGoal {
    fn period_anchor(&self) -> PeriodAnchor {
        PeriodAnchor::Year(self.year)
    }
}

impl PeriodRecord for MonthlyGoal {
    fn period_anchor(&self) -> PeriodAnchor {
        PeriodAnchor::Year(self.year)
    }
}

// Follows the week start even when the stored `year` was set explicitly.
impl PeriodRecord for WeeklyGoal {
    fn period_anchor(&self) -> PeriodAnchor {
        PeriodAnchor::WeekStart(self.week_start_date)
    }
}

/// Returns the year shard a stored goal belongs to.
pub fn resolve_year<R: PeriodRecord + ?Sized>(record: &R) -> i32 {
    record.period_anchor().year()
}

impl GoalInput {
    /// Period field carried by the payload, if any.
    ///
    /// An explicit `year` wins. Otherwise yearly/monthly payloads use the year
    /// of `target_date` and weekly payloads the year of `week_start_date`.
    pub fn period_anchor(&self) -> Option<PeriodAnchor> {
        match self {
            Self::Yearly {
                year, target_date, ..
            }
            | Self::Monthly {
                year, target_date, ..
            } => year
                .or_else(|| target_date.map(|date| date.year()))
                .map(PeriodAnchor::Year),
            Self::Weekly {
                week_start_date,
                year,
                ..
            } => Some(match year {
                Some(year) => PeriodAnchor::Year(*year),
                None => PeriodAnchor::WeekStart(*week_start_date),
            }),
        }
    }
}

/// Returns the year shard a write payload targets.
///
/// Payloads without any period field belong to `fallback_year` (the viewed
/// year for the revalidation plan, the store's default year for persistence).
pub fn resolve_input_year(input: &GoalInput, fallback_year: i32) -> i32 {
    input
        .period_anchor()
        .map_or(fallback_year, PeriodAnchor::year)
}
