//! Single-instance handle over the contact store connection.
//!
//! # Invariants
//! - Exactly one connection per `Store`; every access takes its mutex.
//! - `write` closures run in one `IMMEDIATE` transaction: commit on `Ok`,
//!   rollback on `Err`.

use super::{open_db, open_db_in_memory, DbResult};
use crate::repo::StorageError;
use log::warn;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Owns the SQLite connection backing contacts and notes.
///
/// Construct it once at process start and hand it to the use-cases that need
/// storage. The internal mutex is the single writer lock: a reconciliation
/// pass and a note upsert never interleave.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Opens (or creates) a file-backed store and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a private in-memory store and applies migrations.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps a connection that already went through `open_db`.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Runs `f` against the connection without opening a transaction.
    pub fn read<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Runs `f` inside one write transaction.
    ///
    /// Nothing `f` wrote is visible unless it returns `Ok` and the commit
    /// succeeds.
    pub fn write<T, E>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StorageError>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(StorageError::from)?;

        match f(&tx) {
            Ok(value) => {
                tx.commit().map_err(StorageError::from)?;
                Ok(value)
            }
            Err(err) => {
                warn!("event=store_write module=db status=rollback");
                Err(err)
            }
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}
