//! Environment-driven runtime configuration.
//!
//! Blank variables are treated as unset and fall back to defaults.

use crate::logging::default_log_level;
use crate::repo::document_repo::DEFAULT_DOCUMENT_KEY;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "REQLINKS_DB_PATH";
pub const STORAGE_KEY_ENV: &str = "REQLINKS_STORAGE_KEY";
pub const LOG_LEVEL_ENV: &str = "REQLINKS_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "REQLINKS_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "reqlinks.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the KV store.
    pub db_path: PathBuf,
    /// KV key holding the document.
    pub storage_key: String,
    pub log_level: String,
    /// File logging is disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            storage_key: DEFAULT_DOCUMENT_KEY.to_string(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            storage_key: read(STORAGE_KEY_ENV).unwrap_or(defaults.storage_key),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
