//! Core runtime configuration.
//!
//! # Responsibility
//! - Describe where data and logs live and how persistence behaves.
//! - Parse configuration from JSON and validate it before use.
//!
//! # Invariants
//! - `data_dir` must be absolute.
//! - Unknown JSON fields are rejected rather than ignored.

use crate::logging::{default_log_level, normalize_level};
use crate::model::task::DEFAULT_PRIORITY;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const DEFAULT_DB_FILE_NAME: &str = "pocketdo.sqlite3";
const LOG_DIR_NAME: &str = "logs";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse(serde_json::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config json: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

/// Settings for opening a local store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoreConfig {
    /// Root directory holding the database file and logs.
    pub data_dir: PathBuf,
    #[serde(default = "default_db_file_name")]
    pub db_file_name: String,
    #[serde(default = "default_level_string")]
    pub log_level: String,
    /// Apply writes on a background worker instead of inline.
    #[serde(default = "default_write_behind")]
    pub write_behind: bool,
    /// Priority pre-filled into new task drafts.
    #[serde(default = "default_priority")]
    pub default_priority: String,
}

impl CoreConfig {
    /// Builds a configuration with defaults for everything but `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_file_name: default_db_file_name(),
            log_level: default_level_string(),
            write_behind: default_write_behind(),
            default_priority: default_priority(),
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !self.data_dir.is_absolute() {
            return Err(ConfigError::Invalid(format!(
                "data_dir must be an absolute path, got `{}`",
                self.data_dir.display()
            )));
        }
        let file_name = self.db_file_name.trim();
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "db_file_name must be a plain file name, got `{}`",
                self.db_file_name
            )));
        }
        normalize_level(&self.log_level).map_err(ConfigError::Invalid)?;
        Ok(())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(self.db_file_name.trim())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }
}

fn default_db_file_name() -> String {
    DEFAULT_DB_FILE_NAME.to_string()
}

fn default_level_string() -> String {
    default_log_level().to_string()
}

fn default_write_behind() -> bool {
    true
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, CoreConfig};
    use std::path::PathBuf;

    #[test]
    fn missing_fields_take_defaults() {
        let config = CoreConfig::from_json_str(r#"{"data_dir": "/var/pocketdo"}"#)
            .expect("minimal config should parse");
        assert_eq!(config, CoreConfig::new("/var/pocketdo"));
        assert_eq!(config.db_path(), PathBuf::from("/var/pocketdo/pocketdo.sqlite3"));
        assert_eq!(config.log_dir(), PathBuf::from("/var/pocketdo/logs"));
    }

    #[test]
    fn relative_data_dir_is_rejected() {
        let err = CoreConfig::from_json_str(r#"{"data_dir": "data"}"#)
            .expect_err("relative data_dir must be rejected");
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn unknown_fields_and_bad_levels_are_rejected() {
        let unknown = CoreConfig::from_json_str(r#"{"data_dir": "/d", "colour": "red"}"#)
            .expect_err("unknown field must be rejected");
        assert!(matches!(unknown, ConfigError::Parse(_)));

        let level = CoreConfig::from_json_str(r#"{"data_dir": "/d", "log_level": "loud"}"#)
            .expect_err("unknown level must be rejected");
        assert!(matches!(level, ConfigError::Invalid(_)));
    }

    #[test]
    fn db_file_name_must_not_be_a_path() {
        let mut config = CoreConfig::new("/d");
        config.db_file_name = "../escape.db".to_string();
        assert!(config.validate().is_err());
    }
}
