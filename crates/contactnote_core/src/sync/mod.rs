//! Contact synchronization against the external address book.
//!
//! # Responsibility
//! - Define the read-only contact source boundary.
//! - Compute the set difference between the external and local snapshots.
//! - Apply that difference, with note cascade, as one atomic write.
//!
//! # Invariants
//! - The external source is authoritative whenever it answers.
//! - A source that cannot answer never causes deletions.

pub mod contact_sync;
pub mod reconcile;
pub mod source;
