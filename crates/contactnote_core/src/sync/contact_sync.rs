//! Applies the external contact snapshot to the local mirror.
//!
//! # Responsibility
//! - Plan a pass with [`reconcile`] against the stored contacts.
//! - Apply inserts, then deletes, cascading note removal for contacts that
//!   no longer exist.
//! - Run the whole pass as one `Store::write` transaction.
//!
//! # Invariants
//! - After an applied pass the stored contact set equals the snapshot, with
//!   repeated ids collapsed to their last row.
//! - No note survives whose contact id left the mirror in that pass.
//! - A contact re-inserted under the same id in the same pass keeps its note.
//! - `SourceError` results never touch storage.

use crate::db::Store;
use crate::model::contact::{Contact, ContactId};
use crate::repo::contact_repo::{ContactRepository, SqliteContactRepository};
use crate::repo::note_repo::{NoteRepository, SqliteNoteRepository};
use crate::repo::{StorageError, StorageResult};
use crate::service::note_service::NoteService;
use crate::sync::reconcile::{reconcile, ContactDiff};
use crate::sync::source::ContactSource;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Instant;
use uuid::Uuid;

/// How to treat a snapshot that contains no contacts at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptySnapshotPolicy {
    /// The source is authoritative: every local contact and its note goes.
    #[default]
    Apply,
    /// Treat it like an unavailable source and leave the mirror untouched.
    Skip,
}

impl EmptySnapshotPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Skip => "skip",
        }
    }
}

impl FromStr for EmptySnapshotPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "apply" => Ok(Self::Apply),
            "skip" => Ok(Self::Skip),
            other => Err(format!(
                "unsupported empty snapshot policy `{other}`; expected apply|skip"
            )),
        }
    }
}

/// Tuning for reconciliation passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub empty_snapshot: EmptySnapshotPolicy,
}

/// Counts of rows touched while applying one [`ContactDiff`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Rows written from `to_insert`, replacements included.
    pub inserted: usize,
    /// `to_delete` entries whose id was re-inserted with new fields.
    pub replaced: usize,
    /// Contacts removed from the mirror.
    pub deleted: usize,
    /// Notes removed by cascade.
    pub notes_removed: usize,
}

/// Summary of an applied pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub snapshot_size: usize,
    pub diff: ContactDiff,
    pub applied: ApplyReport,
}

/// Why a pass left the mirror untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    SourceUnavailable(String),
    EmptySnapshot,
}

/// Result of [`sync_contacts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied(SyncReport),
    Skipped { run_id: Uuid, reason: SkipReason },
}

/// Error for reconciliation passes.
#[derive(Debug)]
pub enum SyncError {
    /// The pass was rolled back.
    Storage(StorageError),
}

impl Display for SyncError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "contact sync failed: {err}"),
        }
    }
}

impl Error for SyncError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for SyncError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Reconciles contacts through repository implementations.
///
/// Holds no transaction itself; construct it over repositories borrowed from
/// one `Store::write` transaction to get an atomic pass.
pub struct ContactSyncService<C: ContactRepository, N: NoteRepository> {
    contacts: C,
    notes: NoteService<N>,
}

impl<C: ContactRepository, N: NoteRepository> ContactSyncService<C, N> {
    pub fn new(contacts: C, notes: N) -> Self {
        Self {
            contacts,
            notes: NoteService::new(notes),
        }
    }

    /// Diffs `external` against the stored contacts.
    ///
    /// When `external` repeats an id, only its last row takes part.
    pub fn plan(&self, external: &[Contact]) -> StorageResult<ContactDiff> {
        let local = self.contacts.list_contacts()?;
        Ok(reconcile(&last_row_per_id(external), &local))
    }

    /// Writes every insert, then every delete with note cascade.
    pub fn apply(&self, diff: &ContactDiff) -> StorageResult<ApplyReport> {
        let mut report = ApplyReport::default();

        let reinserted: BTreeSet<ContactId> =
            diff.to_insert.iter().map(|contact| contact.id).collect();
        for contact in &diff.to_insert {
            self.contacts.insert_contact(contact)?;
            report.inserted += 1;
        }

        for contact in &diff.to_delete {
            if reinserted.contains(&contact.id) {
                report.replaced += 1;
                continue;
            }
            if self.contacts.delete_contact(contact.id)? {
                report.deleted += 1;
            }
            if self.notes.delete_note_for_contact(contact.id)? {
                report.notes_removed += 1;
            }
        }

        Ok(report)
    }

    /// Plans and applies in one go.
    pub fn sync_snapshot(&self, external: &[Contact]) -> StorageResult<(ContactDiff, ApplyReport)> {
        let diff = self.plan(external)?;
        let applied = self.apply(&diff)?;
        Ok((diff, applied))
    }
}

/// Runs one full reconciliation pass against `source`.
///
/// The snapshot is fetched before the store lock is taken. Source failures
/// and (depending on `config`) empty snapshots skip the pass; otherwise the
/// diff is planned and applied inside one write transaction.
///
/// # Errors
/// - [`SyncError::Storage`] when any read or write fails; the pass is rolled
///   back as a whole.
pub fn sync_contacts(
    store: &Store,
    source: &dyn ContactSource,
    config: &SyncConfig,
) -> Result<SyncOutcome, SyncError> {
    let run_id = Uuid::new_v4();
    let started_at = Instant::now();
    info!("event=contact_sync module=sync status=start run_id={run_id}");

    let snapshot = match source.fetch_snapshot() {
        Ok(snapshot) => snapshot,
        Err(err) => {
            warn!(
                "event=contact_sync module=sync status=skipped run_id={run_id} reason=source_unavailable duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            return Ok(SyncOutcome::Skipped {
                run_id,
                reason: SkipReason::SourceUnavailable(err.to_string()),
            });
        }
    };

    if snapshot.is_empty() && config.empty_snapshot == EmptySnapshotPolicy::Skip {
        warn!(
            "event=contact_sync module=sync status=skipped run_id={run_id} reason=empty_snapshot duration_ms={}",
            started_at.elapsed().as_millis()
        );
        return Ok(SyncOutcome::Skipped {
            run_id,
            reason: SkipReason::EmptySnapshot,
        });
    }

    let conflicting_ids = count_conflicting_ids(&snapshot);
    if conflicting_ids > 0 {
        warn!(
            "event=contact_sync module=sync status=warn run_id={run_id} conflicting_ids={conflicting_ids}"
        );
    }

    let result = store.write(|tx| -> StorageResult<(ContactDiff, ApplyReport)> {
        let service = ContactSyncService::new(
            SqliteContactRepository::try_new(tx)?,
            SqliteNoteRepository::try_new(tx)?,
        );
        service.sync_snapshot(&snapshot)
    });

    match result {
        Ok((diff, applied)) => {
            info!(
                "event=contact_sync module=sync status=ok run_id={run_id} snapshot_size={} inserted={} replaced={} deleted={} notes_removed={} duration_ms={}",
                snapshot.len(),
                applied.inserted,
                applied.replaced,
                applied.deleted,
                applied.notes_removed,
                started_at.elapsed().as_millis()
            );
            Ok(SyncOutcome::Applied(SyncReport {
                run_id,
                snapshot_size: snapshot.len(),
                diff,
                applied,
            }))
        }
        Err(err) => {
            error!(
                "event=contact_sync module=sync status=error run_id={run_id} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err.into())
        }
    }
}

/// Keeps the last row of every id, in snapshot order.
fn last_row_per_id(snapshot: &[Contact]) -> Vec<Contact> {
    let mut seen = BTreeSet::new();
    let mut rows: Vec<Contact> = snapshot
        .iter()
        .rev()
        .filter(|contact| seen.insert(contact.id))
        .cloned()
        .collect();
    rows.reverse();
    rows
}

/// Counts ids that appear with differing fields; exact copies don't count.
fn count_conflicting_ids(snapshot: &[Contact]) -> usize {
    let mut first_rows: BTreeMap<ContactId, &Contact> = BTreeMap::new();
    let mut conflicting = BTreeSet::new();
    for contact in snapshot {
        match first_rows.entry(contact.id) {
            Entry::Vacant(slot) => {
                slot.insert(contact);
            }
            Entry::Occupied(slot) => {
                if *slot.get() != contact {
                    conflicting.insert(contact.id);
                }
            }
        }
    }
    conflicting.len()
}

#[cfg(test)]
mod tests {
    use super::{count_conflicting_ids, last_row_per_id, EmptySnapshotPolicy};
    use crate::model::contact::Contact;

    #[test]
    fn empty_snapshot_policy_parses_case_insensitively() {
        assert_eq!(
            " Skip ".parse::<EmptySnapshotPolicy>().unwrap(),
            EmptySnapshotPolicy::Skip
        );
        assert_eq!(
            "APPLY".parse::<EmptySnapshotPolicy>().unwrap(),
            EmptySnapshotPolicy::Apply
        );
        assert!("delete".parse::<EmptySnapshotPolicy>().is_err());
    }

    #[test]
    fn only_ids_with_differing_rows_count_as_conflicting() {
        let snapshot = vec![
            Contact::new(1, "Alice", "555-0100"),
            Contact::new(1, "Alice (work)", "555-0110"),
            Contact::new(1, "Alice", "555-0100"),
            Contact::new(2, "Bob", "555-0101"),
            Contact::new(2, "Bob", "555-0101"),
        ];
        assert_eq!(count_conflicting_ids(&snapshot), 1);
        assert_eq!(count_conflicting_ids(&snapshot[3..]), 0);
    }

    #[test]
    fn last_row_wins_for_repeated_ids() {
        let snapshot = vec![
            Contact::new(2, "Bob", "555-0101"),
            Contact::new(1, "Alice", "555-0100"),
            Contact::new(2, "Bob", "555-0101"),
            Contact::new(1, "Alice (work)", "555-0110"),
        ];
        assert_eq!(
            last_row_per_id(&snapshot),
            vec![
                Contact::new(2, "Bob", "555-0101"),
                Contact::new(1, "Alice (work)", "555-0110"),
            ]
        );
    }
}
