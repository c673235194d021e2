//! Helpers for building synthetic low-difficulty chains in tests.

use std::sync::{Arc, Mutex};

use crate::common::hashes::calculate_double_sha256;
use crate::header_chain::difficulty::{bits_to_target, hash_meets_target};
use crate::header_chain::settlement::{SettlementNotice, SettlementSink};
use crate::header_chain::store::ChainEntry;
use crate::header_chain::BlockHeader;

/// Regtest-style bits: roughly every second nonce meets the target.
pub const EASY_BITS: u32 = 0x207fffff;

/// Spacing between consecutive synthetic blocks.
pub const BLOCK_INTERVAL: u32 = 600;

/// Mines a header on top of `prev_block_hash` whose hash is below the target
/// encoded by `parent_bits`.
pub fn mine_header(prev_block_hash: [u8; 32], parent_bits: u32, time: u32, bits: u32) -> BlockHeader {
    let mut seed = prev_block_hash.to_vec();
    seed.extend_from_slice(&time.to_le_bytes());

    let mut header = BlockHeader {
        version: 0x20000000,
        prev_block_hash,
        merkle_root: calculate_double_sha256(&seed),
        time,
        bits,
        nonce: 0,
    };
    let target = bits_to_target(parent_bits);
    while !hash_meets_target(&header.compute_block_hash(), &target) {
        header.nonce += 1;
    }
    header
}

/// Mines a child of `parent` that satisfies the parent's target.
pub fn mine_on(parent: &ChainEntry, time: u32, bits: u32) -> BlockHeader {
    mine_header(parent.hash, parent.header.bits, time, bits)
}

/// Mines `count` linked headers starting at `start_time`, one block interval apart.
pub fn mine_chain(count: usize, first_prev_hash: [u8; 32], start_time: u32) -> Vec<BlockHeader> {
    let times: Vec<u32> = (0..count as u32)
        .map(|i| start_time + i * BLOCK_INTERVAL)
        .collect();
    mine_chain_with_times(first_prev_hash, &times)
}

/// Mines one linked header per timestamp.
pub fn mine_chain_with_times(first_prev_hash: [u8; 32], times: &[u32]) -> Vec<BlockHeader> {
    let mut headers: Vec<BlockHeader> = Vec::with_capacity(times.len());
    for &time in times {
        let prev = headers
            .last()
            .map(|h| h.compute_block_hash())
            .unwrap_or(first_prev_hash);
        headers.push(mine_header(prev, EASY_BITS, time, EASY_BITS));
    }
    headers
}

/// Mines a branch of `count` headers forking off `parent`.
pub fn mine_branch(parent: &ChainEntry, count: usize, start_time: u32) -> Vec<BlockHeader> {
    let mut headers: Vec<BlockHeader> = Vec::with_capacity(count);
    let mut prev = *parent;
    for i in 0..count as u32 {
        let header = mine_on(&prev, start_time + i * BLOCK_INTERVAL, EASY_BITS);
        prev = ChainEntry {
            header,
            hash: header.compute_block_hash(),
            height: prev.height + 1,
        };
        headers.push(header);
    }
    headers
}

/// Settlement sink that records every notice. Clones share the record.
#[derive(Clone, Default, Debug)]
pub struct RecordingSettlementSink {
    notices: Arc<Mutex<Vec<SettlementNotice>>>,
}

impl RecordingSettlementSink {
    pub fn notices(&self) -> Vec<SettlementNotice> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SettlementSink for RecordingSettlementSink {
    fn notify_settlement(&mut self, notice: &SettlementNotice) -> eyre::Result<()> {
        self.notices
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(*notice);
        Ok(())
    }
}

/// Settlement sink whose ledger always rejects the notice.
#[derive(Clone, Copy, Default, Debug)]
pub struct FailingSettlementSink;

impl SettlementSink for FailingSettlementSink {
    fn notify_settlement(&mut self, notice: &SettlementNotice) -> eyre::Result<()> {
        Err(eyre::eyre!("ledger rejected height {}", notice.height))
    }
}
