//! User-authored note attached to a contact.

use crate::model::contact::ContactId;
use serde::{Deserialize, Serialize};

/// Locally generated note identifier (SQLite rowid).
pub type NoteId = i64;

/// Persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub description: String,
    pub contact_id: ContactId,
}

/// Note that has not been stored yet; the store assigns its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub contact_id: ContactId,
    pub description: String,
}

impl NewNote {
    pub fn new(contact_id: ContactId, description: impl Into<String>) -> Self {
        Self {
            contact_id,
            description: description.into(),
        }
    }
}
