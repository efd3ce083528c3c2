//! Runtime configuration resolved from the process environment.
//!
//! | variable                       | default                               |
//! |--------------------------------|---------------------------------------|
//! | `CONTACTNOTE_DB_PATH`          | `<temp_dir>/contactnote.sqlite3`      |
//! | `CONTACTNOTE_EMPTY_SNAPSHOT`   | `apply`                               |
//! | `CONTACTNOTE_LOG_LEVEL`        | `debug` (debug build) / `info`        |
//! | `CONTACTNOTE_LOG_DIR`          | unset: file logging stays off         |
//!
//! Blank values count as unset.

use crate::logging::default_log_level;
use crate::sync::contact_sync::{EmptySnapshotPolicy, SyncConfig};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "CONTACTNOTE_DB_PATH";
pub const EMPTY_SNAPSHOT_ENV: &str = "CONTACTNOTE_EMPTY_SNAPSHOT";
pub const LOG_LEVEL_ENV: &str = "CONTACTNOTE_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "CONTACTNOTE_LOG_DIR";
pub const DEFAULT_DB_FILE_NAME: &str = "contactnote.sqlite3";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, message } => write!(f, "invalid `{key}`: {message}"),
        }
    }
}

impl Error for ConfigError {}

/// Everything a process needs to open the store and run syncs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    #[serde(default)]
    pub sync: SyncConfig,
    pub log_level: String,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            sync: SyncConfig::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Reads the `CONTACTNOTE_*` variables of the current process.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = value(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(policy) = value(EMPTY_SNAPSHOT_ENV) {
            config.sync.empty_snapshot = policy
                .parse::<EmptySnapshotPolicy>()
                .map_err(|message| ConfigError::InvalidValue {
                    key: EMPTY_SNAPSHOT_ENV,
                    message,
                })?;
        }
        if let Some(level) = value(LOG_LEVEL_ENV) {
            config.log_level = level;
        }
        config.log_dir = value(LOG_DIR_ENV).map(PathBuf::from);

        Ok(config)
    }
}
