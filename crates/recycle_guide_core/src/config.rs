//! Process configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve database path and logging settings once at startup.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - Resolution never fails; unusable values surface later when used.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// SQLite database path variable.
pub const DB_PATH_ENV: &str = "RECYCLE_GUIDE_DB_PATH";
/// Log level variable (`trace|debug|info|warn|error`).
pub const LOG_LEVEL_ENV: &str = "RECYCLE_GUIDE_LOG_LEVEL";
/// Log directory variable; file logging stays off when unset.
pub const LOG_DIR_ENV: &str = "RECYCLE_GUIDE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "recycle_guide.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl GuideConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration through `lookup`, which maps a variable name
    /// to its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(DB_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(LOG_LEVEL_ENV).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}
