//! Core domain logic for ContactNote.
//!
//! Mirrors an external address book into a local SQLite store and keeps at
//! most one user note per mirrored contact. This crate is the single source
//! of truth for those invariants; FFI and CLI crates only compose it.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::{ConfigError, CoreConfig, DB_PATH_ENV};
pub use db::{DbError, DbResult, Store};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::contact::{Contact, ContactId};
pub use model::note::{NewNote, Note, NoteId};
pub use repo::contact_repo::{ContactRepository, SqliteContactRepository};
pub use repo::note_repo::{NoteRepository, SqliteNoteRepository};
pub use repo::{StorageError, StorageResult};
pub use service::contact_book::ContactBook;
pub use service::note_service::{NoteService, NoteServiceError};
pub use sync::contact_sync::{
    sync_contacts, ApplyReport, ContactSyncService, EmptySnapshotPolicy, SkipReason, SyncConfig,
    SyncError, SyncOutcome, SyncReport,
};
pub use sync::reconcile::{reconcile, ContactDiff};
pub use sync::source::{ContactSource, JsonFileContactSource, SourceError, StaticContactSource};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
