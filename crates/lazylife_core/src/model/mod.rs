//! Domain records for the task/event/goal screens.
//!
//! # Responsibility
//! - Define the plain records exchanged with the storage collaborator.
//! - Keep calendar fields typed (`chrono`) so malformed ISO strings are
//!   rejected at deserialization, upstream of classification.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Wire names are camelCase to match the storage collaborator payloads.

pub mod event;
pub mod goal;
pub mod task;

use uuid::Uuid;

/// Stable identifier shared by tasks, events and goals.
pub type RecordId = Uuid;
