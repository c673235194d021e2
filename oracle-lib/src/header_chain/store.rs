//! # Trailing Chain Store
//!
//! Fixed-capacity ring of the most recently accepted headers, canonical tip
//! last. It is the only mutable state of the verifier.
//!
//! The store always holds `len` contiguous, hash-linked entries ending at the
//! tip. Once full, every append evicts the oldest entry. A rewind shortens the
//! logical chain; the truncated slots stay physically present until they are
//! overwritten. They are no longer part of the chain, but their timestamps
//! still fill the median-time window, which always spans the slots right
//! behind the cursor.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::common::constants::{CHAIN_WINDOW_CAPACITY, SETTLEMENT_DELAY};
use crate::errors::HeaderChainError;
use crate::header_chain::BlockHeader;

/// An accepted header with its derived hash and assigned height.
#[derive(
    Serialize,
    Deserialize,
    Eq,
    PartialEq,
    Clone,
    Copy,
    Debug,
    Default,
    BorshDeserialize,
    BorshSerialize,
)]
pub struct ChainEntry {
    pub header: BlockHeader,
    #[serde(with = "hex::serde")]
    pub hash: [u8; 32],
    pub height: u64,
}

#[derive(Eq, PartialEq, Clone, Debug, BorshDeserialize, BorshSerialize)]
pub struct TrailingChainStore {
    entries: [ChainEntry; CHAIN_WINDOW_CAPACITY],
    /// Slot of the oldest entry, the next one to be overwritten.
    next: usize,
    /// Number of logically present entries.
    len: usize,
    tip_height: u64,
    /// Highest height already handed to settlement.
    settled_height: u64,
}

impl TrailingChainStore {
    /// Builds a full store from exactly [`CHAIN_WINDOW_CAPACITY`] trust-anchor
    /// headers in chain order, the last one at `tip_height`.
    ///
    /// Anchors are vetted out of band. They are only checked to be hash-linked.
    /// Heights up to `tip_height - SETTLEMENT_DELAY` count as already settled.
    pub fn from_anchors(anchors: &[BlockHeader], tip_height: u64) -> Result<Self, HeaderChainError> {
        if anchors.len() != CHAIN_WINDOW_CAPACITY {
            return Err(HeaderChainError::BootstrapLengthMismatch {
                expected: CHAIN_WINDOW_CAPACITY,
                got: anchors.len(),
            });
        }
        let first_height = tip_height
            .checked_sub(CHAIN_WINDOW_CAPACITY as u64 - 1)
            .ok_or(HeaderChainError::BootstrapHeightTooLow { tip_height })?;

        let mut entries = [ChainEntry::default(); CHAIN_WINDOW_CAPACITY];
        for (i, header) in anchors.iter().enumerate() {
            let hash = header.compute_block_hash();
            if i > 0 && header.prev_block_hash != entries[i - 1].hash {
                return Err(HeaderChainError::PrevBlockHashMismatch {
                    expected: entries[i - 1].hash,
                    got: header.prev_block_hash,
                });
            }
            entries[i] = ChainEntry {
                header: *header,
                hash,
                height: first_height + i as u64,
            };
        }

        Ok(TrailingChainStore {
            entries,
            next: 0,
            len: CHAIN_WINDOW_CAPACITY,
            tip_height,
            settled_height: tip_height.saturating_sub(SETTLEMENT_DELAY),
        })
    }

    pub fn tip(&self) -> &ChainEntry {
        &self.entries[self.slot_behind(0)]
    }

    pub fn tip_height(&self) -> u64 {
        self.tip_height
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn settled_height(&self) -> u64 {
        self.settled_height
    }

    pub(crate) fn mark_settled(&mut self, height: u64) {
        self.settled_height = self.settled_height.max(height);
    }

    /// Iterates over the logically present entries, tip first.
    pub fn iter_from_tip(&self) -> impl Iterator<Item = &ChainEntry> + '_ {
        (0..self.len).map(move |depth| &self.entries[self.slot_behind(depth)])
    }

    /// Timestamps of every physical slot, newest first, including slots
    /// dropped by a rewind that were not overwritten yet.
    pub fn slot_times_from_tip(&self) -> impl Iterator<Item = u32> + '_ {
        (0..CHAIN_WINDOW_CAPACITY)
            .map(move |depth| self.entries[self.slot_behind(depth)].header.time)
    }

    /// Returns the entry at `height` if it is still in the window.
    pub fn entry_at(&self, height: u64) -> Option<&ChainEntry> {
        let depth = self.depth_of(height)?;
        Some(&self.entries[self.slot_behind(depth)])
    }

    /// Scans back from the tip for an entry whose hash equals `hash` and
    /// returns its height. Reaches at most `CHAIN_WINDOW_CAPACITY - 1` blocks
    /// below the tip.
    pub fn find_ancestor(&self, hash: &[u8; 32]) -> Option<u64> {
        self.iter_from_tip()
            .find(|entry| entry.hash == *hash)
            .map(|entry| entry.height)
    }

    /// Overwrites the oldest slot with a new tip.
    pub fn append(&mut self, header: BlockHeader, hash: [u8; 32], height: u64) {
        self.entries[self.next] = ChainEntry {
            header,
            hash,
            height,
        };
        self.next = (self.next + 1) % CHAIN_WINDOW_CAPACITY;
        self.len = (self.len + 1).min(CHAIN_WINDOW_CAPACITY);
        self.tip_height = height;
    }

    /// Moves the tip back to `height`, logically dropping every later entry.
    pub fn rewind_to(&mut self, height: u64) -> Result<(), HeaderChainError> {
        let depth = self
            .depth_of(height)
            .ok_or(HeaderChainError::RewindOutOfWindow { height })?;

        self.next = (self.next + CHAIN_WINDOW_CAPACITY - depth) % CHAIN_WINDOW_CAPACITY;
        self.len -= depth;
        self.tip_height = height;
        Ok(())
    }

    /// Checks the invariants a deserialized snapshot must satisfy.
    pub fn check_consistency(&self) -> Result<(), HeaderChainError> {
        if self.next >= CHAIN_WINDOW_CAPACITY {
            return Err(HeaderChainError::CorruptStore(format!(
                "cursor {} out of range",
                self.next
            )));
        }
        if self.len == 0 || self.len > CHAIN_WINDOW_CAPACITY {
            return Err(HeaderChainError::CorruptStore(format!(
                "length {} out of range",
                self.len
            )));
        }
        if self.settled_height > self.tip_height.saturating_sub(SETTLEMENT_DELAY) {
            return Err(HeaderChainError::CorruptStore(format!(
                "settled height {} is not {} blocks below tip height {}",
                self.settled_height, SETTLEMENT_DELAY, self.tip_height
            )));
        }

        let mut expected_height = self.tip_height;
        let mut child: Option<&ChainEntry> = None;
        for entry in self.iter_from_tip() {
            if entry.height != expected_height {
                return Err(HeaderChainError::CorruptStore(format!(
                    "entry at height {} where {} was expected",
                    entry.height, expected_height
                )));
            }
            if entry.hash != entry.header.compute_block_hash() {
                return Err(HeaderChainError::CorruptStore(format!(
                    "stored hash of height {} does not match its header",
                    entry.height
                )));
            }
            if let Some(child) = child {
                if child.header.prev_block_hash != entry.hash {
                    return Err(HeaderChainError::CorruptStore(format!(
                        "height {} does not link to height {}",
                        child.height, entry.height
                    )));
                }
            }
            child = Some(entry);
            expected_height = expected_height.saturating_sub(1);
        }
        Ok(())
    }

    /// Assembles a store slot by slot, skipping every check.
    #[cfg(test)]
    pub(crate) fn from_raw_parts(
        entries: [ChainEntry; CHAIN_WINDOW_CAPACITY],
        next: usize,
        len: usize,
        tip_height: u64,
        settled_height: u64,
    ) -> Self {
        TrailingChainStore {
            entries,
            next,
            len,
            tip_height,
            settled_height,
        }
    }

    /// Ring index of the entry `depth` blocks below the tip.
    fn slot_behind(&self, depth: usize) -> usize {
        (self.next + 2 * CHAIN_WINDOW_CAPACITY - 1 - depth) % CHAIN_WINDOW_CAPACITY
    }

    fn depth_of(&self, height: u64) -> Option<usize> {
        let depth = self.tip_height.checked_sub(height)?;
        if depth < self.len as u64 {
            Some(depth as usize)
        } else {
            None
        }
    }
}
