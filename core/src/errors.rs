//! # Errors
//!
//! This module defines errors returned by the oracle host. Chain validation
//! failures keep their own [`HeaderChainError`] kind so submitters can still
//! match on it after it crossed this layer.

use oracle_lib::HeaderChainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the oracle.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// A submitted header or batch was rejected, or bootstrap failed.
    #[error("Header chain rejected the submission: {0}")]
    HeaderChain(#[from] HeaderChainError),

    /// ConfigError is returned when the configuration is invalid
    #[error("ConfigError: {0}")]
    ConfigError(String),
    /// Returned when a required environment variable is missing
    #[error("Environment variable is not set: {0}")]
    EnvVarNotSet(&'static str),
    /// Returned when an environment variable holds a value that can't be parsed
    #[error("Environment variable {0} is malformed: {1}")]
    EnvVarMalformed(&'static str, String),

    #[error("Anchor file {path:?} is invalid: {reason}")]
    InvalidAnchorFile { path: PathBuf, reason: String },
    #[error("Line {line} of {path:?} is not a valid header: {source}")]
    InvalidHeaderLine {
        path: PathBuf,
        line: usize,
        source: HeaderChainError,
    },
    #[error("Snapshot {0:?} already exists, the oracle is bootstrapped only once")]
    AlreadyBootstrapped(PathBuf),
    #[error("Snapshot {0:?} not found, run `init` first")]
    SnapshotNotFound(PathBuf),
    #[error("Snapshot could not be decoded: {0}")]
    SnapshotDecode(String),
    /// Another process holds the lock file next to the snapshot
    #[error("Snapshot is locked by another process, lock file {0:?} exists")]
    SnapshotLocked(PathBuf),

    /// Another thread panicked while holding the verifier lock
    #[error("Verifier lock is poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] eyre::Report),
}

impl OracleError {
    /// Returns the chain validation error, if this is one.
    pub fn as_header_chain_error(&self) -> Option<&HeaderChainError> {
        match self {
            OracleError::HeaderChain(e) => Some(e),
            OracleError::InvalidHeaderLine { source, .. } => Some(source),
            _ => None,
        }
    }
}
