//! # Errors
//!
//! Every rejection of a submitted header or batch maps onto exactly one
//! [`HeaderChainError`] variant. Variants are stable: automated submitters
//! match on them (or on [`HeaderChainError::code`]) to decide whether to fix
//! the data locally, resubmit with another parent or wait for a longer chain.
//!
//! None of these errors is fatal. A rejected call leaves the trailing chain
//! store exactly as it was.

use serde::Serialize;
use thiserror::Error;

/// Broad class of a [`HeaderChainError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The header bytes themselves are unusable.
    Structural,
    /// The header does not connect to the stored chain.
    Linkage,
    /// Timestamp or history requirements are not met.
    Temporal,
    /// The header hash does not meet the target.
    ProofOfWork,
    /// The branch loses under the longest-chain rule.
    ChainSelection,
    /// The verifier itself is set up incorrectly.
    Configuration,
}

/// Errors returned by the header chain verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderChainError {
    #[error("Malformed header: expected 80 bytes, got {length}")]
    MalformedHeader { length: usize },

    #[error(
        "Previous block hash does not match the tip. Expected: {}, got: {}",
        hex::encode(.expected),
        hex::encode(.got)
    )]
    PrevBlockHashMismatch { expected: [u8; 32], got: [u8; 32] },

    #[error("Fork point {} is not in the trailing window", hex::encode(.prev_block_hash))]
    ForkPointNotFound { prev_block_hash: [u8; 32] },

    #[error("Timestamp {time} is below the median time past {median_time_past}")]
    InvalidTimestamp { time: u32, median_time_past: u32 },

    #[error("Median time past needs {required} entries, only {available} available")]
    InsufficientHistory { available: usize, required: usize },

    #[error("Hash {} does not meet the target encoded by bits {bits:#010x}", hex::encode(.hash))]
    InvalidProofOfWork { hash: [u8; 32], bits: u32 },

    #[error(
        "Branch of {branch_length} headers from fork height {fork_height} does not exceed tip height {tip_height}"
    )]
    ChainNotLonger {
        fork_height: u64,
        branch_length: usize,
        tip_height: u64,
    },

    #[error("Settlement target is not set, cannot dispatch height {height}")]
    SettlementTargetUnset { height: u64 },

    #[error("Settlement of height {height} failed: {reason}")]
    SettlementFailed { height: u64, reason: String },

    #[error("Chain submission contains no headers")]
    EmptyChain,

    #[error("Bootstrap needs exactly {expected} anchor headers, got {got}")]
    BootstrapLengthMismatch { expected: usize, got: usize },

    #[error("Bootstrap tip height {tip_height} leaves no room for the anchor window")]
    BootstrapHeightTooLow { tip_height: u64 },

    #[error("Height {height} is not in the trailing window")]
    RewindOutOfWindow { height: u64 },

    #[error("Trailing chain store is inconsistent: {0}")]
    CorruptStore(String),
}

impl HeaderChainError {
    /// Stable identifier of the error kind.
    pub fn code(&self) -> &'static str {
        match self {
            HeaderChainError::MalformedHeader { .. } => "MALFORMED_HEADER",
            HeaderChainError::PrevBlockHashMismatch { .. } => "PREV_BLOCK_HASH_MISMATCH",
            HeaderChainError::ForkPointNotFound { .. } => "FORK_POINT_NOT_FOUND",
            HeaderChainError::InvalidTimestamp { .. } => "INVALID_TIMESTAMP",
            HeaderChainError::InsufficientHistory { .. } => "INSUFFICIENT_HISTORY",
            HeaderChainError::InvalidProofOfWork { .. } => "INVALID_PROOF_OF_WORK",
            HeaderChainError::ChainNotLonger { .. } => "CHAIN_NOT_LONGER",
            HeaderChainError::SettlementTargetUnset { .. } => "SETTLEMENT_TARGET_UNSET",
            HeaderChainError::SettlementFailed { .. } => "SETTLEMENT_FAILED",
            HeaderChainError::EmptyChain => "EMPTY_CHAIN",
            HeaderChainError::BootstrapLengthMismatch { .. } => "BOOTSTRAP_LENGTH_MISMATCH",
            HeaderChainError::BootstrapHeightTooLow { .. } => "BOOTSTRAP_HEIGHT_TOO_LOW",
            HeaderChainError::RewindOutOfWindow { .. } => "REWIND_OUT_OF_WINDOW",
            HeaderChainError::CorruptStore(_) => "CORRUPT_STORE",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            HeaderChainError::MalformedHeader { .. }
            | HeaderChainError::EmptyChain
            | HeaderChainError::CorruptStore(_) => ErrorCategory::Structural,
            HeaderChainError::PrevBlockHashMismatch { .. }
            | HeaderChainError::ForkPointNotFound { .. }
            | HeaderChainError::RewindOutOfWindow { .. } => ErrorCategory::Linkage,
            HeaderChainError::InvalidTimestamp { .. }
            | HeaderChainError::InsufficientHistory { .. } => ErrorCategory::Temporal,
            HeaderChainError::InvalidProofOfWork { .. } => ErrorCategory::ProofOfWork,
            HeaderChainError::ChainNotLonger { .. } => ErrorCategory::ChainSelection,
            HeaderChainError::SettlementTargetUnset { .. }
            | HeaderChainError::SettlementFailed { .. }
            | HeaderChainError::BootstrapLengthMismatch { .. }
            | HeaderChainError::BootstrapHeightTooLow { .. } => ErrorCategory::Configuration,
        }
    }
}
