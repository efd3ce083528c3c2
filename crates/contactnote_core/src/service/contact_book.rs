//! Use-case facade for the presentation boundary.
//!
//! # Responsibility
//! - Own the process `Store` and the sync configuration.
//! - Run each boundary call as exactly one store read or write.
//!
//! # Invariants
//! - Note upserts, note deletes and contact deletes are atomic.
//! - No call here blocks on anything but the store lock and SQLite I/O.

use crate::db::Store;
use crate::model::contact::{Contact, ContactId};
use crate::model::note::Note;
use crate::repo::contact_repo::{ContactRepository, SqliteContactRepository};
use crate::repo::note_repo::SqliteNoteRepository;
use crate::repo::StorageResult;
use crate::service::note_service::{NoteService, NoteServiceError};
use crate::sync::contact_sync::{sync_contacts, SyncConfig, SyncError, SyncOutcome};
use crate::sync::source::ContactSource;
use rusqlite::Connection;

/// Contacts plus their notes, backed by one [`Store`].
pub struct ContactBook {
    store: Store,
    sync: SyncConfig,
}

impl ContactBook {
    pub fn new(store: Store, sync: SyncConfig) -> Self {
        Self { store, sync }
    }

    pub fn sync_config(&self) -> &SyncConfig {
        &self.sync
    }

    /// Lists the mirrored contacts.
    pub fn list_contacts(&self) -> StorageResult<Vec<Contact>> {
        self.store
            .read(|conn| SqliteContactRepository::try_new(conn)?.list_contacts())
    }

    /// Lists every note.
    pub fn list_notes(&self) -> StorageResult<Vec<Note>> {
        self.store.read(|conn| note_service(conn)?.list_notes())
    }

    /// Gets the note of `contact_id`; `None` when it has none.
    pub fn find_note_for_contact(&self, contact_id: ContactId) -> StorageResult<Option<Note>> {
        self.store
            .read(|conn| note_service(conn)?.find_note_for_contact(contact_id))
    }

    /// Saves `description` as the single note of `contact_id`.
    pub fn create_or_update_note(
        &self,
        contact_id: ContactId,
        description: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let description = description.into();
        self.store
            .write(|tx| note_service(tx)?.create_or_update_note(contact_id, description))
    }

    /// Deletes the note of `contact_id`; returns `false` when there was none.
    pub fn delete_note_for_contact(&self, contact_id: ContactId) -> StorageResult<bool> {
        self.store
            .write(|tx| note_service(tx)?.delete_note_for_contact(contact_id))
    }

    /// Removes one contact from the mirror together with its note.
    ///
    /// The next sync pass re-inserts it if the source still lists it.
    pub fn delete_contact(&self, contact_id: ContactId) -> StorageResult<bool> {
        self.store.write(|tx| {
            let removed = SqliteContactRepository::try_new(tx)?.delete_contact(contact_id)?;
            note_service(tx)?.delete_note_for_contact(contact_id)?;
            Ok(removed)
        })
    }

    /// Runs one reconciliation pass against `source`.
    pub fn sync_contacts(&self, source: &dyn ContactSource) -> Result<SyncOutcome, SyncError> {
        sync_contacts(&self.store, source, &self.sync)
    }
}

fn note_service(conn: &Connection) -> StorageResult<NoteService<SqliteNoteRepository<'_>>> {
    Ok(NoteService::new(SqliteNoteRepository::try_new(conn)?))
}
