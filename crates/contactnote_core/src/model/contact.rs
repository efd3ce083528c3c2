//! Contact record mirrored from the external address book.

use serde::{Deserialize, Serialize};

/// Identifier assigned by the external contact source, never generated here.
pub type ContactId = i64;

/// One row of the external address book.
///
/// Equality, hashing and ordering are structural over all fields, so a
/// renamed contact compares unequal to its previous version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    /// As delivered by the source; not normalized.
    #[serde(alias = "phoneNumber")]
    pub phone_number: String,
}

impl Contact {
    pub fn new(id: ContactId, name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            phone_number: phone_number.into(),
        }
    }
}
