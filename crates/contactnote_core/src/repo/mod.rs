//! Repository contracts and SQLite implementations for contacts and notes.
//!
//! # Responsibility
//! - Define use-case oriented data access traits.
//! - Keep SQL inside the persistence boundary.
//!
//! # Invariants
//! - Lookups that find nothing return `None`/`false`, never an error.
//! - Every storage failure surfaces as [`StorageError`]; nothing is retried.

use crate::db::DbError;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod contact_repo;
pub mod note_repo;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of the local contact/note store.
#[derive(Debug)]
pub enum StorageError {
    /// SQLite or migration failure.
    Db(DbError),
    /// Connection was not migrated: a table is missing.
    MissingRequiredTable(&'static str),
    /// Connection was not migrated: a column is missing.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// A previous holder of the store lock panicked.
    LockPoisoned,
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "contact store requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "contact store requires column `{column}` in table `{table}`"
            ),
            Self::LockPoisoned => write!(f, "contact store lock poisoned"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Fails unless `table` exists with every column in `columns`.
pub(crate) fn ensure_table(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> StorageResult<()> {
    if !table_exists(conn, table)? {
        return Err(StorageError::MissingRequiredTable(table));
    }

    let present = table_columns(conn, table)?;
    for column in columns {
        if !present.iter().any(|name| name == column) {
            return Err(StorageError::MissingRequiredColumn { table, column });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_columns(conn: &Connection, table: &str) -> StorageResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get::<_, String>(1)?);
    }
    Ok(columns)
}
