//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `contactnote_core` linkage with a deterministic version probe.
//! - `contactnote_cli <snapshot.json>` syncs a JSON contact export into the
//!   store configured through `CONTACTNOTE_*` variables.

use contactnote_core::{
    core_version, init_logging, ContactBook, CoreConfig, JsonFileContactSource, SkipReason, Store,
    SyncOutcome,
};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("contactnote_core version={}", core_version());

    let Some(snapshot_path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    match run_sync(&snapshot_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run_sync(snapshot_path: &str) -> Result<(), String> {
    let config = CoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(log_dir) = config.log_dir.as_ref() {
        init_logging(&config.log_level, &log_dir.to_string_lossy()).map_err(|err| err.to_string())?;
    }

    let store = Store::open(&config.db_path).map_err(|err| err.to_string())?;
    let book = ContactBook::new(store, config.sync);
    let source = JsonFileContactSource::new(snapshot_path);

    match book.sync_contacts(&source).map_err(|err| err.to_string())? {
        SyncOutcome::Applied(report) => println!(
            "sync=applied run_id={} snapshot_size={} inserted={} replaced={} deleted={} notes_removed={}",
            report.run_id,
            report.snapshot_size,
            report.applied.inserted,
            report.applied.replaced,
            report.applied.deleted,
            report.applied.notes_removed
        ),
        SyncOutcome::Skipped { run_id, reason } => match reason {
            SkipReason::SourceUnavailable(detail) => {
                println!("sync=skipped run_id={run_id} reason=source_unavailable detail={detail}")
            }
            SkipReason::EmptySnapshot => {
                println!("sync=skipped run_id={run_id} reason=empty_snapshot")
            }
        },
    }

    let contacts = book.list_contacts().map_err(|err| err.to_string())?;
    let notes = book.list_notes().map_err(|err| err.to_string())?;
    println!("contacts={} notes={}", contacts.len(), notes.len());
    Ok(())
}
