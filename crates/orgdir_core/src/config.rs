//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve the database path and logging settings from `ORGDIR_*` variables.
//!
//! # Invariants
//! - `ORGDIR_DB_PATH` is required and non-blank.
//! - The log level is always one of the levels `init_logging` accepts.

use crate::logging::{default_log_level, normalize_level};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "ORGDIR_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "ORGDIR_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "ORGDIR_LOG_DIR";

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    Missing(&'static str),
    /// `ORGDIR_LOG_LEVEL` holds an unsupported value.
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(var) => write!(f, "required setting `{var}` is not set"),
            Self::InvalidLogLevel(message) => write!(f, "invalid `{LOG_LEVEL_VAR}`: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl DirectoryConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_db(None)
    }

    /// Reads configuration from the process environment, with `db_path`
    /// taking precedence over `ORGDIR_DB_PATH` when given.
    pub fn from_env_with_db(db_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        Self::resolve(db_path, |key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Self::resolve(None, lookup)
    }

    fn resolve(
        db_override: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = db_override
            .or_else(|| read(DB_PATH_VAR).map(PathBuf::from))
            .ok_or(ConfigError::Missing(DB_PATH_VAR))?;
        let log_level = match read(LOG_LEVEL_VAR) {
            Some(level) => normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };
        let log_dir = read(LOG_DIR_VAR).map(PathBuf::from);

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}
