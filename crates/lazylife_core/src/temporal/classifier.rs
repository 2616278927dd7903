//! Calendar-day classifier.
//!
//! # Invariants
//! - Rules are applied in order: no date, today key, tomorrow key, strictly
//!   before today, otherwise future.
//! - `classify` never yields `Completed`; completion is a grouping concern.

use chrono::{Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Day key format shared by group keys and comparisons.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Bucket a dated record falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Task without a date.
    None,
    Today,
    Tomorrow,
    Overdue,
    Future,
    /// Finished task, regardless of its date.
    Completed,
}

impl Category {
    /// Stable key string used as a fixed group key.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Overdue => "overdue",
            Self::Future => "future",
            Self::Completed => "completed",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Formats `date` as `yyyy-mm-dd`.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Classifies one calendar day against today.
///
/// `today_key` and `tomorrow_key` must be the `date_key` of `today` and of the
/// following day.
pub fn classify(
    date: Option<NaiveDate>,
    today: NaiveDate,
    today_key: &str,
    tomorrow_key: &str,
) -> Category {
    let Some(date) = date else {
        return Category::None;
    };

    let key = date_key(date);
    if key == today_key {
        Category::Today
    } else if key == tomorrow_key {
        Category::Tomorrow
    } else if date < today {
        Category::Overdue
    } else {
        Category::Future
    }
}

/// Today's reference day plus its precomputed keys.
///
/// Built once per grouping pass so every record is classified against the
/// same day even if the pass straddles midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayAnchor {
    today: NaiveDate,
    today_key: String,
    tomorrow_key: String,
}

impl DayAnchor {
    /// Anchors classification on `today`.
    pub fn for_date(today: NaiveDate) -> Self {
        // NaiveDate::MAX has no successor; the today rule shadows tomorrow there.
        let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
        Self {
            today,
            today_key: date_key(today),
            tomorrow_key: date_key(tomorrow),
        }
    }

    /// Anchors classification on the current local calendar day.
    pub fn local_today() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn today_key(&self) -> &str {
        &self.today_key
    }

    pub fn tomorrow_key(&self) -> &str {
        &self.tomorrow_key
    }

    /// Classifies an optional calendar day.
    pub fn classify(&self, date: Option<NaiveDate>) -> Category {
        classify(date, self.today, &self.today_key, &self.tomorrow_key)
    }
}
