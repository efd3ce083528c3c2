//! Domain records for mirrored contacts and user notes.
//!
//! # Invariants
//! - A `Contact` is a value: two records are the same contact only when
//!   id, name and phone number all match.
//! - A `Note` belongs to at most one contact through `contact_id`.

pub mod contact;
pub mod note;
