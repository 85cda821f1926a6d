//! Runtime configuration, read from the environment:
//! - `TASKBOARD_SOURCE` - board data, an `http(s)://` URL or a JSON file path.
//!   Defaults to the mock API.
//! - `TASKBOARD_DEFAULT_LIST` - list that receives new tasks. Defaults to `1`.
//! - `TASKBOARD_LOG_FILE` - where logs go while the board is on screen.
//!   Defaults to `taskboard.log`.

use crate::loader::DataSource;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_SOURCE: &str = "https://run.mocky.io/v3/7841d1af-e8d5-446a-bac5-3506fdd05659";
pub const DEFAULT_LIST_ID: &str = "1";
pub const DEFAULT_LOG_FILE: &str = "taskboard.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub source: DataSource,
    pub default_list_id: String,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DataSource::parse(DEFAULT_SOURCE),
            default_list_id: DEFAULT_LIST_ID.to_string(),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the
    /// process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str, default: &str| -> Result<String, ConfigError> {
            match lookup(key) {
                None => Ok(default.to_string()),
                Some(v) if v.trim().is_empty() => {
                    Err(ConfigError::InvalidValue(key.to_string(), "must not be empty".to_string()))
                }
                Some(v) => Ok(v.trim().to_string()),
            }
        };

        Ok(Self {
            source: DataSource::parse(&value("TASKBOARD_SOURCE", DEFAULT_SOURCE)?),
            default_list_id: value("TASKBOARD_DEFAULT_LIST", DEFAULT_LIST_ID)?,
            log_file: PathBuf::from(value("TASKBOARD_LOG_FILE", DEFAULT_LOG_FILE)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_list_id, "1");
        assert!(matches!(config.source, DataSource::Http(_)));
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("TASKBOARD_SOURCE", "board.json"),
            ("TASKBOARD_DEFAULT_LIST", "todo"),
            ("TASKBOARD_LOG_FILE", "/tmp/board.log"),
        ]))
        .unwrap();

        assert_eq!(config.source, DataSource::File(PathBuf::from("board.json")));
        assert_eq!(config.default_list_id, "todo");
        assert_eq!(config.log_file, PathBuf::from("/tmp/board.log"));
    }

    #[test]
    fn rejects_empty_values() {
        let err = Config::from_lookup(lookup(&[("TASKBOARD_DEFAULT_LIST", "  ")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue("TASKBOARD_DEFAULT_LIST".into(), "must not be empty".into())
        );
    }
}
