//! Contact source boundary.
//!
//! The device address book lives outside this crate. Callers adapt it to
//! [`ContactSource`]; the core only relies on the snapshot contract:
//! every call returns the full current set of contacts, or an error meaning
//! "no answer right now".

use crate::model::contact::Contact;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Why a source could not produce a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Authorization is missing or the source query failed.
    SourceUnavailable(String),
    /// The source answered with data that is not a contact list.
    InvalidSnapshot(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SourceUnavailable(reason) => write!(f, "contact source unavailable: {reason}"),
            Self::InvalidSnapshot(reason) => write!(f, "invalid contact snapshot: {reason}"),
        }
    }
}

impl Error for SourceError {}

/// Read-only provider of the authoritative contact list.
pub trait ContactSource {
    /// Returns the full current snapshot. Order carries no meaning.
    fn fetch_snapshot(&self) -> Result<Vec<Contact>, SourceError>;
}

/// Source backed by a snapshot the caller already holds.
///
/// The presentation layer reads the device address book itself and hands the
/// rows over; when it has no permission it builds [`Self::unavailable`].
#[derive(Debug, Clone)]
pub struct StaticContactSource {
    snapshot: Result<Vec<Contact>, SourceError>,
}

impl StaticContactSource {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self {
            snapshot: Ok(contacts),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            snapshot: Err(SourceError::SourceUnavailable(reason.into())),
        }
    }
}

impl ContactSource for StaticContactSource {
    fn fetch_snapshot(&self) -> Result<Vec<Contact>, SourceError> {
        self.snapshot.clone()
    }
}

/// Source reading a JSON array of contacts from disk.
///
/// A missing file means the export has not been produced yet and maps to
/// [`SourceError::SourceUnavailable`], not to an empty address book.
#[derive(Debug, Clone)]
pub struct JsonFileContactSource {
    path: PathBuf,
}

impl JsonFileContactSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactSource for JsonFileContactSource {
    fn fetch_snapshot(&self) -> Result<Vec<Contact>, SourceError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => SourceError::SourceUnavailable(format!(
                "snapshot file `{}` does not exist",
                self.path.display()
            )),
            _ => SourceError::SourceUnavailable(format!(
                "failed to read snapshot file `{}`: {err}",
                self.path.display()
            )),
        })?;

        serde_json::from_str(&raw).map_err(|err| {
            SourceError::InvalidSnapshot(format!("`{}`: {err}", self.path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactSource, JsonFileContactSource, SourceError, StaticContactSource};
    use crate::model::contact::Contact;

    #[test]
    fn static_source_returns_given_snapshot() {
        let contacts = vec![Contact::new(1, "Alice", "555-0100")];
        let source = StaticContactSource::new(contacts.clone());
        assert_eq!(source.fetch_snapshot().unwrap(), contacts);
    }

    #[test]
    fn unavailable_static_source_reports_reason() {
        let source = StaticContactSource::unavailable("permission not granted");
        assert_eq!(
            source.fetch_snapshot().unwrap_err(),
            SourceError::SourceUnavailable("permission not granted".to_string())
        );
    }

    #[test]
    fn json_source_reads_contact_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "name": "Alice", "phone_number": "555-0100"},
                {"id": 2, "name": "Bob", "phoneNumber": "555-0101"}
            ]"#,
        )
        .unwrap();

        let snapshot = JsonFileContactSource::new(&path).fetch_snapshot().unwrap();
        assert_eq!(
            snapshot,
            vec![
                Contact::new(1, "Alice", "555-0100"),
                Contact::new(2, "Bob", "555-0101"),
            ]
        );
    }

    #[test]
    fn json_source_missing_file_is_unavailable_not_empty() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileContactSource::new(dir.path().join("absent.json"))
            .fetch_snapshot()
            .unwrap_err();
        assert!(matches!(err, SourceError::SourceUnavailable(_)));
    }

    #[test]
    fn json_source_rejects_malformed_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.json");
        std::fs::write(&path, r#"{"id": 1}"#).unwrap();

        let err = JsonFileContactSource::new(&path)
            .fetch_snapshot()
            .unwrap_err();
        assert!(matches!(err, SourceError::InvalidSnapshot(_)));
    }
}
