//! Task record.

use crate::model::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One actionable task with an optional execution day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    /// Calendar day the task is planned for. `None` means "no date".
    pub execution_date: Option<NaiveDate>,
    pub completed: bool,
    /// Manual sort position inside a list.
    #[serde(default)]
    pub order: i64,
    /// Tracked time in seconds.
    #[serde(default)]
    pub actual_time: i64,
}

impl Task {
    /// Creates an open, undated task with a generated id.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            execution_date: None,
            completed: false,
            order: 0,
            actual_time: 0,
        }
    }

    /// Creates an open task planned for `date`.
    pub fn scheduled(title: impl Into<String>, date: NaiveDate) -> Self {
        let mut task = Self::new(title);
        task.execution_date = Some(date);
        task
    }
}
