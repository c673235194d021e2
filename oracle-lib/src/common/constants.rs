//! # Common Constants
//! Protocol constants of the header verifier. They size fixed arrays and
//! define confirmation depth, so they are not configurable at runtime.

/// Length of a consensus-encoded Bitcoin block header.
pub const HEADER_SIZE: usize = 80;

/// Number of accepted headers kept in the trailing chain store.
///
/// Bounds the depth of a reorganization the verifier can resolve to
/// `CHAIN_WINDOW_CAPACITY - 1` blocks.
pub const CHAIN_WINDOW_CAPACITY: usize = 17;

/// Number of timestamps the median-time-past rule looks at.
pub const MEDIAN_TIME_SPAN: usize = 11;

/// Confirmations a height needs before it is handed to settlement.
pub const SETTLEMENT_DELAY: u64 = 6;
