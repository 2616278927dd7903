//! Year-sharded goal collections and their cache coherence.
//!
//! # Responsibility
//! - Derive the owning year of a goal record or write payload.
//! - Define the storage and revalidation collaborator contracts.
//! - Decide and issue shard refreshes after each goal write.
//!
//! # Invariants
//! - Shards are addressed by `(entity kind, year)`; this module never mutates
//!   cached shard data directly, it only asks the revalidation port.

pub mod period;
pub mod revalidation;
pub mod service;
pub mod shard_cache;
pub mod store;
