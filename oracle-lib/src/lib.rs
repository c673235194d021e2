//! # Oracle-lib
//!
//! Light verification of Bitcoin block headers for a settlement ledger that
//! trusts this crate as its only view of Bitcoin's proof-of-work chain.
//!
//! The crate re-derives every submitted header's hash, checks it against the
//! consensus rules it tracks (linkage, median-time-past, proof of work) and
//! keeps a short trailing window of the canonical chain that is deep enough to
//! detect and resolve reorganizations. Confirmed heights are handed to a
//! [`header_chain::settlement::SettlementSink`].

pub mod common;
pub mod errors;
pub mod header_chain;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use errors::{ErrorCategory, HeaderChainError};
pub use header_chain::engine::{ChainEvent, HeaderChainVerifier};
pub use header_chain::settlement::{SettlementNotice, SettlementSink};
pub use header_chain::store::{ChainEntry, TrailingChainStore};
pub use header_chain::BlockHeader;
