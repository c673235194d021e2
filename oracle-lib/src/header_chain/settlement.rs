//! Outbound seam towards the settlement ledger.
//!
//! Once a height is [`SETTLEMENT_DELAY`](crate::common::constants::SETTLEMENT_DELAY)
//! blocks deep, the verifier hands its timestamp and difficulty to a
//! [`SettlementSink`]. The ledger behind the sink matches the notice against
//! expiring options and must handle redelivery idempotently.

use crypto_bigint::{Encoding, U256};
use serde::{Deserialize, Serialize};

/// A confirmed height, ready for settlement.
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Copy, Debug)]
pub struct SettlementNotice {
    pub height: u64,
    pub timestamp: u32,
    /// Target decoded from the block's own `bits`, big-endian.
    #[serde(with = "hex::serde")]
    pub difficulty: [u8; 32],
}

impl SettlementNotice {
    pub fn difficulty(&self) -> U256 {
        U256::from_be_bytes(self.difficulty)
    }
}

/// Destination of settlement notices.
///
/// Calls are synchronous and made from inside the accept operation that
/// confirmed the height. An error aborts that operation and leaves the chain
/// store untouched; the verifier never retries.
pub trait SettlementSink {
    fn notify_settlement(&mut self, notice: &SettlementNotice) -> eyre::Result<()>;
}

impl<S: SettlementSink + ?Sized> SettlementSink for Box<S> {
    fn notify_settlement(&mut self, notice: &SettlementNotice) -> eyre::Result<()> {
        (**self).notify_settlement(notice)
    }
}

impl<S: SettlementSink + ?Sized> SettlementSink for &mut S {
    fn notify_settlement(&mut self, notice: &SettlementNotice) -> eyre::Result<()> {
        (**self).notify_settlement(notice)
    }
}
