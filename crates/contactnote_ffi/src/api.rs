//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the contact list, note CRUD and contact sync to Dart via FRB.
//! - Compose the one process-wide `ContactBook` from environment config.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Failures come back as `ok=false` plus a message, never as a throw.
//! - Every call blocks on SQLite I/O; Dart must call from a worker isolate.

use contactnote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Contact, ContactBook,
    CoreConfig, Note, SkipReason, StaticContactSource, Store, SyncOutcome,
};
use log::info;
use once_cell::sync::OnceCell;

static CONTACT_BOOK: OnceCell<ContactBook> = OnceCell::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    "pong".to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Contact row as rendered by the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub id: i64,
    pub name: String,
    pub phone_number: String,
}

/// Note row keyed by its owning contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteItem {
    pub note_id: i64,
    pub contact_id: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    pub items: Vec<ContactItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteListResponse {
    pub ok: bool,
    pub items: Vec<NoteItem>,
    pub message: String,
}

/// Result of a single-note lookup; `note=None` with `ok=true` means "no note".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteLookupResponse {
    pub ok: bool,
    pub note: Option<NoteItem>,
    pub message: String,
}

/// Result of note save/delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteActionResponse {
    pub ok: bool,
    /// Saved note for `note_save`; always `None` for `note_delete`.
    pub note: Option<NoteItem>,
    pub message: String,
}

impl NoteActionResponse {
    fn success(message: impl Into<String>, note: Option<NoteItem>) -> Self {
        Self {
            ok: true,
            note,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            note: None,
            message: message.into(),
        }
    }
}

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSyncResponse {
    pub ok: bool,
    /// `false` when the pass was skipped or failed.
    pub applied: bool,
    pub inserted: u32,
    pub replaced: u32,
    pub deleted: u32,
    pub notes_removed: u32,
    pub message: String,
}

/// Lists mirrored contacts.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list() -> ContactListResponse {
    match with_contact_book(|book| book.list_contacts().map_err(|err| err.to_string())) {
        Ok(contacts) => ContactListResponse {
            ok: true,
            message: format!("Loaded {} contact(s).", contacts.len()),
            items: contacts.into_iter().map(to_contact_item).collect(),
        },
        Err(err) => ContactListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("contacts_list failed: {err}"),
        },
    }
}

/// Lists every note.
#[flutter_rust_bridge::frb(sync)]
pub fn notes_list() -> NoteListResponse {
    match with_contact_book(|book| book.list_notes().map_err(|err| err.to_string())) {
        Ok(notes) => NoteListResponse {
            ok: true,
            message: format!("Loaded {} note(s).", notes.len()),
            items: notes.into_iter().map(to_note_item).collect(),
        },
        Err(err) => NoteListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("notes_list failed: {err}"),
        },
    }
}

/// Gets the note of one contact.
#[flutter_rust_bridge::frb(sync)]
pub fn note_for_contact(contact_id: i64) -> NoteLookupResponse {
    match with_contact_book(|book| {
        book.find_note_for_contact(contact_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(note)) => NoteLookupResponse {
            ok: true,
            note: Some(to_note_item(note)),
            message: "Note found.".to_string(),
        },
        Ok(None) => NoteLookupResponse {
            ok: true,
            note: None,
            message: "No note.".to_string(),
        },
        Err(err) => NoteLookupResponse {
            ok: false,
            note: None,
            message: format!("note_for_contact failed: {err}"),
        },
    }
}

/// Saves the note text of one contact, creating or updating it.
#[flutter_rust_bridge::frb(sync)]
pub fn note_save(contact_id: i64, description: String) -> NoteActionResponse {
    match with_contact_book(|book| {
        book.create_or_update_note(contact_id, description)
            .map_err(|err| err.to_string())
    }) {
        Ok(note) => NoteActionResponse::success("Note saved.", Some(to_note_item(note))),
        Err(err) => NoteActionResponse::failure(format!("note_save failed: {err}")),
    }
}

/// Deletes the note of one contact; succeeds when there is none.
#[flutter_rust_bridge::frb(sync)]
pub fn note_delete(contact_id: i64) -> NoteActionResponse {
    match with_contact_book(|book| {
        book.delete_note_for_contact(contact_id)
            .map_err(|err| err.to_string())
    }) {
        Ok(true) => NoteActionResponse::success("Note deleted.", None),
        Ok(false) => NoteActionResponse::success("No note to delete.", None),
        Err(err) => NoteActionResponse::failure(format!("note_delete failed: {err}")),
    }
}

/// Mirrors the device address book into the local store.
///
/// Input semantics:
/// - `snapshot`: every contact the device currently lists.
/// - `source_authorized`: `false` when contact permission is missing; the
///   snapshot is ignored and nothing is deleted.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_sync(snapshot: Vec<ContactItem>, source_authorized: bool) -> ContactSyncResponse {
    let source = if source_authorized {
        StaticContactSource::new(snapshot.into_iter().map(from_contact_item).collect())
    } else {
        StaticContactSource::unavailable("contacts permission not granted")
    };

    match with_contact_book(|book| book.sync_contacts(&source).map_err(|err| err.to_string())) {
        Ok(SyncOutcome::Applied(report)) => ContactSyncResponse {
            ok: true,
            applied: true,
            inserted: saturating_u32(report.applied.inserted),
            replaced: saturating_u32(report.applied.replaced),
            deleted: saturating_u32(report.applied.deleted),
            notes_removed: saturating_u32(report.applied.notes_removed),
            message: format!("Contacts synced ({}).", report.run_id),
        },
        Ok(SyncOutcome::Skipped { reason, .. }) => ContactSyncResponse {
            ok: true,
            message: match reason {
                SkipReason::SourceUnavailable(detail) => format!("Sync skipped: {detail}"),
                SkipReason::EmptySnapshot => "Sync skipped: empty snapshot.".to_string(),
            },
            ..ContactSyncResponse::default()
        },
        Err(err) => ContactSyncResponse {
            message: format!("contacts_sync failed: {err}"),
            ..ContactSyncResponse::default()
        },
    }
}

fn with_contact_book<T>(
    f: impl FnOnce(&ContactBook) -> Result<T, String>,
) -> Result<T, String> {
    let book = CONTACT_BOOK.get_or_try_init(open_contact_book)?;
    f(book)
}

fn open_contact_book() -> Result<ContactBook, String> {
    let config = CoreConfig::from_env().map_err(|err| format!("config invalid: {err}"))?;
    let store = Store::open(&config.db_path)
        .map_err(|err| format!("contact store open failed: {err}"))?;
    info!(
        "event=contact_book_open module=ffi status=ok empty_snapshot={}",
        config.sync.empty_snapshot.as_str()
    );
    Ok(ContactBook::new(store, config.sync))
}

fn to_contact_item(contact: Contact) -> ContactItem {
    ContactItem {
        id: contact.id,
        name: contact.name,
        phone_number: contact.phone_number,
    }
}

fn from_contact_item(item: ContactItem) -> Contact {
    Contact::new(item.id, item.name, item.phone_number)
}

fn to_note_item(note: Note) -> NoteItem {
    NoteItem {
        note_id: note.id,
        contact_id: note.contact_id,
        description: note.description,
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
