//! # Oracle Core
//!
//! Host side of the header oracle: configuration, persistence, the settlement
//! log and a lock around the verifier from [`oracle_lib`] so it can be shared
//! between threads.

pub mod anchors;
pub mod cli;
pub mod commands;
pub mod config;
pub mod errors;
pub mod oracle;
pub mod settlement;
pub mod snapshot;
pub mod utils;

pub use oracle::{HeaderOracle, OracleStatus};
