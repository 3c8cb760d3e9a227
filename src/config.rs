//! User configuration loaded from `config.toml`.
//!
//! Every field has a default, so a missing file or a partial file is fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::history::DEFAULT_TIMESTAMP_FORMAT;

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "zcalc";

const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Text shown in place of a result when evaluation fails.
    pub error_marker: String,
    /// Text shown when the history list is empty.
    pub empty_history: String,
    /// `strftime`-style layout for history timestamps.
    pub timestamp_format: String,
    /// Where state is stored. Defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            error_marker: "Error".to_string(),
            empty_history: "No history yet".to_string(),
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Directory for persisted state: the configured one, else the platform
    /// data directory, else the current directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|dir| dir.join(APP_DIR))
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(r#"error_marker = "Hata""#).unwrap();
        assert_eq!(config.error_marker, "Hata");
        assert_eq!(config.timestamp_format, DEFAULT_TIMESTAMP_FORMAT);
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"
            error_marker = "Err"
            timestamp_format = "%H:%M"
            data_dir = "/tmp/zcalc"
            "#,
        )
        .unwrap();
        assert_eq!(config.timestamp_format, "%H:%M");
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/tmp/zcalc"));
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        assert!(Config::parse("error_marker = 5").is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "error_marker = \"Hata\"\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().error_marker, "Hata");
    }
}
