//! # Configuration Options
//!
//! This module defines configuration options.
//!
//! This module is base for `cli` module and not dependent on it. Therefore,
//! this module can be used independently.
//!
//! ## Configuration File
//!
//! Configuration options can be read from a TOML file. File contents are
//! described in `OracleConfig` struct.
//!
//! ## Environment Variables
//!
//! `ORACLE_ANCHORS_PATH` and `ORACLE_SNAPSHOT_PATH` overwrite the file when
//! both are set. `ORACLE_SETTLEMENT_LOG_PATH` is optional.

use crate::errors::OracleError;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::PathBuf};

pub const ANCHORS_PATH_ENV: &str = "ORACLE_ANCHORS_PATH";
pub const SNAPSHOT_PATH_ENV: &str = "ORACLE_SNAPSHOT_PATH";
pub const SETTLEMENT_LOG_PATH_ENV: &str = "ORACLE_SETTLEMENT_LOG_PATH";

/// Configuration options for the oracle binary and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleConfig {
    /// JSON file with the bootstrap anchors and the height of the last one.
    pub anchors_path: PathBuf,
    /// Borsh encoded trailing chain store, written after every submission.
    pub snapshot_path: PathBuf,
    /// Settlement notices are appended here as JSON lines. If unset, any
    /// submission that confirms a height is rejected.
    pub settlement_log_path: Option<PathBuf>,
}

impl OracleConfig {
    /// Create a new `OracleConfig` with default values.
    pub fn new() -> Self {
        OracleConfig {
            ..Default::default()
        }
    }

    /// Read contents of a TOML file and generate a `OracleConfig`.
    pub fn try_parse_file(path: PathBuf) -> Result<Self, OracleError> {
        let mut contents = String::new();

        let mut file = match File::open(path.clone()) {
            Ok(f) => f,
            Err(e) => return Err(OracleError::ConfigError(e.to_string())),
        };

        if let Err(e) = file.read_to_string(&mut contents) {
            return Err(OracleError::ConfigError(e.to_string()));
        }

        tracing::trace!("Using configuration file: {:?}", path);

        OracleConfig::try_parse_from(contents)
    }

    /// Try to parse a `OracleConfig` from given TOML formatted string and
    /// generate a `OracleConfig`.
    pub fn try_parse_from(input: String) -> Result<Self, OracleError> {
        match toml::from_str::<OracleConfig>(&input) {
            Ok(c) => Ok(c),
            Err(e) => Err(OracleError::ConfigError(e.to_string())),
        }
    }

    /// Reads configuration from environment variables.
    pub fn from_env() -> Result<Self, OracleError> {
        let read = |name: &'static str| -> Result<Option<PathBuf>, OracleError> {
            match std::env::var(name) {
                Ok(value) if value.is_empty() => Err(OracleError::EnvVarMalformed(
                    name,
                    "value is empty".to_string(),
                )),
                Ok(value) => Ok(Some(PathBuf::from(value))),
                Err(std::env::VarError::NotPresent) => Ok(None),
                Err(e) => Err(OracleError::EnvVarMalformed(name, e.to_string())),
            }
        };

        let anchors_path =
            read(ANCHORS_PATH_ENV)?.ok_or(OracleError::EnvVarNotSet(ANCHORS_PATH_ENV))?;
        let snapshot_path =
            read(SNAPSHOT_PATH_ENV)?.ok_or(OracleError::EnvVarNotSet(SNAPSHOT_PATH_ENV))?;
        let settlement_log_path = read(SETTLEMENT_LOG_PATH_ENV)?;

        Ok(OracleConfig {
            anchors_path,
            snapshot_path,
            settlement_log_path,
        })
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            anchors_path: PathBuf::from("anchors.json"),
            snapshot_path: PathBuf::from("oracle_snapshot.bin"),
            settlement_log_path: Some(PathBuf::from("settlements.jsonl")),
        }
    }
}
