//! Note use-case service keyed by contact.
//!
//! # Responsibility
//! - Provide list/upsert/delete/find APIs addressed by `contact_id`.
//! - Keep the one-note-per-contact invariant through check-then-act.
//!
//! # Invariants
//! - `create_or_update_note` never creates a second note for a contact.
//! - Deleting a note for a contact without one is a no-op.
//! - Callers run the check-then-act pair inside one write transaction
//!   (see `Store::write`).

use crate::model::contact::ContactId;
use crate::model::note::{NewNote, Note};
use crate::repo::note_repo::NoteRepository;
use crate::repo::{StorageError, StorageResult};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Persistence-layer failure.
    Storage(StorageError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::InconsistentState(_) => None,
        }
    }
}

impl From<StorageError> for NoteServiceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every note.
    pub fn list_notes(&self) -> StorageResult<Vec<Note>> {
        self.repo.list_notes()
    }

    /// Saves `description` as the note of `contact_id`.
    ///
    /// Updates the existing note in place when the contact has one, inserts a
    /// new note otherwise. Returns the stored row.
    pub fn create_or_update_note(
        &self,
        contact_id: ContactId,
        description: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let description = description.into();

        match self.repo.find_note_id_by_contact_id(contact_id)? {
            Some(note_id) => {
                let note = Note {
                    id: note_id,
                    description,
                    contact_id,
                };
                if !self.repo.update_note(&note)? {
                    return Err(NoteServiceError::InconsistentState(
                        "note id resolved for contact vanished before update",
                    ));
                }
                debug!(
                    "event=note_upsert module=note status=ok action=update contact_id={contact_id} note_id={note_id}"
                );
            }
            None => {
                let note_id = self
                    .repo
                    .insert_note(&NewNote::new(contact_id, description))?;
                debug!(
                    "event=note_upsert module=note status=ok action=insert contact_id={contact_id} note_id={note_id}"
                );
            }
        }

        self.repo
            .find_note_by_contact_id(contact_id)?
            .ok_or(NoteServiceError::InconsistentState(
                "saved note not found in read-back",
            ))
    }

    /// Deletes the note of `contact_id` if there is one.
    ///
    /// Returns whether a note was removed.
    pub fn delete_note_for_contact(&self, contact_id: ContactId) -> StorageResult<bool> {
        let Some(note) = self.repo.find_note_by_contact_id(contact_id)? else {
            return Ok(false);
        };
        let removed = self.repo.delete_note(note.id)?;
        debug!(
            "event=note_delete module=note status=ok contact_id={contact_id} note_id={} removed={removed}",
            note.id
        );
        Ok(removed)
    }

    /// Gets the note of `contact_id`.
    pub fn find_note_for_contact(&self, contact_id: ContactId) -> StorageResult<Option<Note>> {
        self.repo.find_note_by_contact_id(contact_id)
    }
}
