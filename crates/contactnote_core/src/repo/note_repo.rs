//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist user notes and resolve them by owning contact.
//!
//! # Invariants
//! - Note ids are generated by SQLite on insert and never reused.
//! - No uniqueness is enforced on `contact_id` here; by-contact lookups
//!   return the oldest matching note.

use crate::model::contact::ContactId;
use crate::model::note::{NewNote, Note, NoteId};
use crate::repo::{ensure_table, StorageResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    description,
    contact_id
FROM notes";

/// Repository interface for note persistence.
pub trait NoteRepository {
    /// Returns every stored note.
    fn list_notes(&self) -> StorageResult<Vec<Note>>;
    /// Stores a new note and returns its generated id.
    fn insert_note(&self, note: &NewNote) -> StorageResult<NoteId>;
    /// Rewrites description and owner. Returns `false` when the id is unknown.
    fn update_note(&self, note: &Note) -> StorageResult<bool>;
    /// Removes one note by id. Returns `false` when the id is unknown.
    fn delete_note(&self, id: NoteId) -> StorageResult<bool>;
    /// Gets the note attached to `contact_id`.
    fn find_note_by_contact_id(&self, contact_id: ContactId) -> StorageResult<Option<Note>>;
    /// Gets only the id of the note attached to `contact_id`.
    fn find_note_id_by_contact_id(&self, contact_id: ContactId)
        -> StorageResult<Option<NoteId>>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        ensure_table(conn, "notes", &["id", "description", "contact_id"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn list_notes(&self) -> StorageResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
        let notes = stmt
            .query_map([], parse_note_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(notes)
    }

    fn insert_note(&self, note: &NewNote) -> StorageResult<NoteId> {
        self.conn.execute(
            "INSERT INTO notes (description, contact_id) VALUES (?1, ?2);",
            params![note.description.as_str(), note.contact_id],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_note(&self, note: &Note) -> StorageResult<bool> {
        let changed = self.conn.execute(
            "UPDATE notes
             SET
                description = ?2,
                contact_id = ?3
             WHERE id = ?1;",
            params![note.id, note.description.as_str(), note.contact_id],
        )?;
        Ok(changed > 0)
    }

    fn delete_note(&self, id: NoteId) -> StorageResult<bool> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }

    fn find_note_by_contact_id(&self, contact_id: ContactId) -> StorageResult<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("{NOTE_SELECT_SQL} WHERE contact_id = ?1 ORDER BY id ASC LIMIT 1;"),
                [contact_id],
                parse_note_row,
            )
            .optional()?;
        Ok(note)
    }

    fn find_note_id_by_contact_id(
        &self,
        contact_id: ContactId,
    ) -> StorageResult<Option<NoteId>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM notes WHERE contact_id = ?1 ORDER BY id ASC LIMIT 1;",
                [contact_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }
}

fn parse_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: row.get("id")?,
        description: row.get("description")?,
        contact_id: row.get("contact_id")?,
    })
}
