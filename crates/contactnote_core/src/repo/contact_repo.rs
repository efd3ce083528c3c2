//! Contact repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the local mirror of the external address book.
//!
//! # Invariants
//! - `contacts.id` is the source-assigned id; this layer never generates one.
//! - Inserting an existing id replaces that row in place.
//! - Deletes are keyed by id only.

use crate::model::contact::{Contact, ContactId};
use crate::repo::{ensure_table, StorageResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    name,
    phone_number
FROM contacts";

/// Repository interface for the mirrored contact table.
pub trait ContactRepository {
    /// Returns every stored contact.
    fn list_contacts(&self) -> StorageResult<Vec<Contact>>;
    /// Gets one contact by source id.
    fn get_contact(&self, id: ContactId) -> StorageResult<Option<Contact>>;
    /// Stores one contact, replacing any row with the same id.
    fn insert_contact(&self, contact: &Contact) -> StorageResult<ContactId>;
    /// Rewrites name and number. Returns `false` when the id is unknown.
    fn update_contact(&self, contact: &Contact) -> StorageResult<bool>;
    /// Removes one contact by id. Returns `false` when the id is unknown.
    fn delete_contact(&self, id: ContactId) -> StorageResult<bool>;
}

/// SQLite-backed contact repository.
///
/// Borrows a connection, so it works equally on a plain connection and on an
/// open transaction.
pub struct SqliteContactRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_table(conn, "contacts", &["id", "name", "phone_number"])?;
        Ok(Self { conn })
    }
}

impl ContactRepository for SqliteContactRepository<'_> {
    fn list_contacts(&self) -> StorageResult<Vec<Contact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))?;
        let contacts = stmt
            .query_map([], parse_contact_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    fn get_contact(&self, id: ContactId) -> StorageResult<Option<Contact>> {
        let contact = self
            .conn
            .query_row(
                &format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_contact_row,
            )
            .optional()?;
        Ok(contact)
    }

    fn insert_contact(&self, contact: &Contact) -> StorageResult<ContactId> {
        self.conn.execute(
            "INSERT INTO contacts (id, name, phone_number)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                phone_number = excluded.phone_number;",
            params![contact.id, contact.name.as_str(), contact.phone_number.as_str()],
        )?;
        Ok(contact.id)
    }

    fn update_contact(&self, contact: &Contact) -> StorageResult<bool> {
        let changed = self.conn.execute(
            "UPDATE contacts
             SET
                name = ?2,
                phone_number = ?3
             WHERE id = ?1;",
            params![contact.id, contact.name.as_str(), contact.phone_number.as_str()],
        )?;
        Ok(changed > 0)
    }

    fn delete_contact(&self, id: ContactId) -> StorageResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_contact_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get("id")?,
        name: row.get("name")?,
        phone_number: row.get("phone_number")?,
    })
}
