//! Flutter-facing bindings for ContactNote core.
//!
//! Only use-case level functions live here; all invariants are enforced by
//! `contactnote_core`.

pub mod api;
