//! Calendar event record.
//!
//! # Invariants
//! - `start_datetime` is mandatory; events are always dated.
//! - `end_datetime` must not be earlier than `start_datetime` when set.

use crate::model::RecordId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Event category tag shown as a colored badge by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventCategory {
    Work,
    Life,
    Housework,
    Social,
    Play,
    Hobby,
    Health,
    Procedure,
    Birthday,
    Anniversary,
    Sports,
}

/// One calendar event, point-in-time or ranged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: RecordId,
    pub title: String,
    pub start_datetime: NaiveDateTime,
    pub end_datetime: Option<NaiveDateTime>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub category: Option<EventCategory>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Event invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "event end `{end}` is earlier than start `{start}`")
            }
        }
    }
}

impl Error for EventValidationError {}

impl Event {
    /// Creates a point event starting at `start`.
    pub fn new(title: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            start_datetime: start,
            end_datetime: None,
            all_day: false,
            category: None,
            description: None,
        }
    }

    /// Creates a ranged event, rejecting a reversed window.
    pub fn ranged(
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Self, EventValidationError> {
        let mut event = Self::new(title, start);
        event.end_datetime = Some(end);
        event.validate()?;
        Ok(event)
    }

    /// Checks the start/end ordering invariant.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        match self.end_datetime {
            Some(end) if end < self.start_datetime => Err(EventValidationError::EndBeforeStart {
                start: self.start_datetime,
                end,
            }),
            _ => Ok(()),
        }
    }

    /// Returns whether the event spans more than one calendar day.
    pub fn is_multi_day(&self) -> bool {
        self.end_datetime
            .is_some_and(|end| end.date() != self.start_datetime.date())
    }
}
