//! Calendar-day classification and grouping of dated records.
//!
//! # Responsibility
//! - Map a record's day to a bucket relative to "today".
//! - Assemble ordered, labeled groups for the task and event lists.
//!
//! # Invariants
//! - All comparisons are calendar-day based; time of day never matters.
//! - Computation is pure and synchronous; nothing here touches storage.

pub mod classifier;
pub mod grouping;
pub mod titles;
