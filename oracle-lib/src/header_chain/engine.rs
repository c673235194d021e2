//! # Verification Engine
//!
//! Validates candidate headers against the trailing chain store and extends
//! it, either one header at a time on top of the tip or with a batch that may
//! replace the last few blocks (longest-chain rule).
//!
//! ## Atomicity
//!
//! Every accept call works on a scratch copy of the store. Settlement notices
//! are collected while validating and delivered only once the whole call has
//! validated; the scratch copy replaces the store only after every delivery
//! succeeded. A failed call therefore leaves the store byte-identical.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::common::constants::SETTLEMENT_DELAY;
use crate::errors::HeaderChainError;
use crate::header_chain::difficulty::{bits_to_target, bits_to_target_bytes, hash_meets_target};
use crate::header_chain::median_time::median_time_past;
use crate::header_chain::settlement::{SettlementNotice, SettlementSink};
use crate::header_chain::store::TrailingChainStore;
use crate::header_chain::BlockHeader;

/// Observable outcome of a successful accept call, in emission order.
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Copy, Debug)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ChainEvent {
    /// The submitted branch replaces at least one stored block. Carries the
    /// merkle root of the branch's last header.
    ChainReorged {
        #[serde(with = "hex::serde")]
        merkle_root: [u8; 32],
    },
    HeaderAccepted {
        #[serde(with = "hex::serde")]
        hash: [u8; 32],
        timestamp: u32,
        height: u64,
    },
}

/// Side effects of an accept call, held back until it commits.
#[derive(Default)]
struct PendingUpdates {
    events: Vec<ChainEvent>,
    settlements: Vec<SettlementNotice>,
}

/// Header chain verifier over a bootstrapped trailing window.
///
/// The store is the only mutable chain state. The settlement sink may be left
/// unset; any call that would need to dispatch a settlement then fails with
/// [`HeaderChainError::SettlementTargetUnset`].
#[derive(Debug)]
pub struct HeaderChainVerifier<S> {
    store: TrailingChainStore,
    settlement: Option<S>,
}

impl<S: SettlementSink> HeaderChainVerifier<S> {
    /// Bootstraps the verifier from exactly 17 trust-anchor headers, the last
    /// one at `tip_height`.
    pub fn bootstrap(anchors: &[BlockHeader], tip_height: u64) -> Result<Self, HeaderChainError> {
        let store = TrailingChainStore::from_anchors(anchors, tip_height)?;
        info!(
            tip_height,
            tip_hash = %hex::encode(store.tip().hash),
            "Header chain verifier bootstrapped"
        );
        Ok(HeaderChainVerifier {
            store,
            settlement: None,
        })
    }

    /// Resumes from a previously persisted store.
    pub fn from_store(store: TrailingChainStore) -> Result<Self, HeaderChainError> {
        store.check_consistency()?;
        Ok(HeaderChainVerifier {
            store,
            settlement: None,
        })
    }

    pub fn with_settlement_sink(mut self, sink: S) -> Self {
        self.settlement = Some(sink);
        self
    }

    pub fn set_settlement_sink(&mut self, sink: S) {
        self.settlement = Some(sink);
    }

    pub fn settlement_sink(&self) -> Option<&S> {
        self.settlement.as_ref()
    }

    pub fn store(&self) -> &TrailingChainStore {
        &self.store
    }

    pub fn tip_height(&self) -> u64 {
        self.store.tip_height()
    }

    pub fn median_time_past(&self) -> Result<u32, HeaderChainError> {
        median_time_past(&self.store)
    }

    /// Validates `candidate` against the current tip and appends it.
    ///
    /// Checks, in order: the parent hash is the tip hash, the timestamp is not
    /// below the median time past, and the block hash is below the target
    /// encoded by the tip's `bits`.
    pub fn accept_next(&mut self, candidate: &BlockHeader) -> Result<Vec<ChainEvent>, HeaderChainError> {
        let mut staged = self.store.clone();
        let mut pending = PendingUpdates::default();

        extend_tip(&mut staged, candidate, &mut pending)?;

        self.commit(staged, pending)
    }

    /// Extends or replaces the tip with a contiguous branch of headers.
    ///
    /// The branch must fork from a block inside the trailing window and end
    /// strictly higher than the current tip. All headers are validated exactly
    /// like [`HeaderChainVerifier::accept_next`], each on top of the previous
    /// one. Any failure rejects the whole branch.
    pub fn accept_chain(&mut self, candidates: &[BlockHeader]) -> Result<Vec<ChainEvent>, HeaderChainError> {
        let (first, last) = match (candidates.first(), candidates.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(HeaderChainError::EmptyChain),
        };

        let fork_height = self.store.find_ancestor(&first.prev_block_hash).ok_or(
            HeaderChainError::ForkPointNotFound {
                prev_block_hash: first.prev_block_hash,
            },
        )?;

        let tip_height = self.store.tip_height();
        if fork_height + candidates.len() as u64 <= tip_height {
            return Err(HeaderChainError::ChainNotLonger {
                fork_height,
                branch_length: candidates.len(),
                tip_height,
            });
        }

        let mut staged = self.store.clone();
        let mut pending = PendingUpdates::default();

        if fork_height < tip_height {
            warn!(
                fork_height,
                tip_height,
                branch_length = candidates.len(),
                "Reorganizing the trailing chain"
            );
            pending.events.push(ChainEvent::ChainReorged {
                merkle_root: last.merkle_root,
            });
        }

        staged.rewind_to(fork_height)?;
        for candidate in candidates {
            extend_tip(&mut staged, candidate, &mut pending)?;
        }

        self.commit(staged, pending)
    }

    /// Delivers pending settlements and swaps in the staged store.
    fn commit(
        &mut self,
        staged: TrailingChainStore,
        pending: PendingUpdates,
    ) -> Result<Vec<ChainEvent>, HeaderChainError> {
        if let Some(first) = pending.settlements.first() {
            let sink = self
                .settlement
                .as_mut()
                .ok_or(HeaderChainError::SettlementTargetUnset {
                    height: first.height,
                })?;

            for notice in &pending.settlements {
                sink.notify_settlement(notice)
                    .map_err(|e| HeaderChainError::SettlementFailed {
                        height: notice.height,
                        reason: e.to_string(),
                    })?;
                info!(
                    height = notice.height,
                    timestamp = notice.timestamp,
                    "Settlement dispatched"
                );
            }
        }

        self.store = staged;
        info!(
            tip_height = self.store.tip_height(),
            tip_hash = %hex::encode(self.store.tip().hash),
            "Tip advanced"
        );
        Ok(pending.events)
    }
}

/// Validates one header on top of the staged tip and appends it.
fn extend_tip(
    store: &mut TrailingChainStore,
    candidate: &BlockHeader,
    pending: &mut PendingUpdates,
) -> Result<(), HeaderChainError> {
    let tip = *store.tip();

    if candidate.prev_block_hash != tip.hash {
        return Err(HeaderChainError::PrevBlockHashMismatch {
            expected: tip.hash,
            got: candidate.prev_block_hash,
        });
    }

    let median_time = median_time_past(store)?;
    if candidate.time < median_time {
        return Err(HeaderChainError::InvalidTimestamp {
            time: candidate.time,
            median_time_past: median_time,
        });
    }

    // The threshold comes from the parent's bits, not the candidate's own.
    let hash = candidate.compute_block_hash();
    if !hash_meets_target(&hash, &bits_to_target(tip.header.bits)) {
        return Err(HeaderChainError::InvalidProofOfWork {
            hash,
            bits: tip.header.bits,
        });
    }

    let height = tip.height + 1;
    store.append(*candidate, hash, height);
    debug!(height, hash = %hex::encode(hash), "Header appended");
    pending.events.push(ChainEvent::HeaderAccepted {
        hash,
        timestamp: candidate.time,
        height,
    });

    if let Some(settle_height) = height.checked_sub(SETTLEMENT_DELAY) {
        if settle_height > store.settled_height() {
            if let Some(entry) = store.entry_at(settle_height) {
                pending.settlements.push(SettlementNotice {
                    height: entry.height,
                    timestamp: entry.header.time,
                    difficulty: bits_to_target_bytes(entry.header.bits),
                });
                store.mark_settled(settle_height);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::CHAIN_WINDOW_CAPACITY;
    use crate::header_chain::store::ChainEntry;
    use crate::test_utils::{
        mine_branch, mine_chain, mine_on, FailingSettlementSink, RecordingSettlementSink, EASY_BITS,
    };
    use hex_literal::hex;

    const TIP: u64 = 838902;
    const START_TIME: u32 = 1712930000;

    fn verifier() -> (HeaderChainVerifier<RecordingSettlementSink>, RecordingSettlementSink) {
        let anchors = mine_chain(CHAIN_WINDOW_CAPACITY, [0u8; 32], START_TIME);
        let sink = RecordingSettlementSink::default();
        let verifier = HeaderChainVerifier::bootstrap(&anchors, TIP)
            .unwrap()
            .with_settlement_sink(sink.clone());
        (verifier, sink)
    }

    fn next_time(verifier: &HeaderChainVerifier<RecordingSettlementSink>) -> u32 {
        verifier.store().tip().header.time + 600
    }

    #[test]
    fn test_accept_next_extends_tip() {
        let (mut verifier, _) = verifier();
        let candidate = mine_on(verifier.store().tip(), next_time(&verifier), EASY_BITS);

        let events = verifier.accept_next(&candidate).unwrap();

        assert_eq!(verifier.tip_height(), TIP + 1);
        assert_eq!(verifier.store().tip().header, candidate);
        assert_eq!(
            events,
            vec![ChainEvent::HeaderAccepted {
                hash: candidate.compute_block_hash(),
                timestamp: candidate.time,
                height: TIP + 1,
            }]
        );
    }

    #[test]
    fn test_monotonic_extension() {
        let (mut verifier, _) = verifier();
        for successes in 1..=25u64 {
            let candidate = mine_on(verifier.store().tip(), next_time(&verifier), EASY_BITS);
            verifier.accept_next(&candidate).unwrap();
            assert_eq!(verifier.tip_height(), TIP + successes);
        }
    }

    #[test]
    fn test_prev_block_hash_mismatch() {
        let (mut verifier, _) = verifier();
        let before = verifier.store().clone();
        let candidate = BlockHeader {
            version: 0x20000000,
            prev_block_hash: hex!(
                "00000000000000000001a66adbcce19ffa90fb72f37115e43b407ea49b4a2dbf"
            ),
            merkle_root: [0x33; 32],
            time: 1712940028,
            bits: 0x17034219,
            nonce: 1539690831,
        };

        let err = verifier.accept_next(&candidate).unwrap_err();

        assert_eq!(
            err,
            HeaderChainError::PrevBlockHashMismatch {
                expected: before.tip().hash,
                got: candidate.prev_block_hash,
            }
        );
        assert_eq!(verifier.store(), &before);
    }

    #[test]
    fn test_stale_timestamp() {
        let (mut verifier, _) = verifier();
        let median = verifier.median_time_past().unwrap();
        let candidate = mine_on(verifier.store().tip(), median / 2, EASY_BITS);

        assert_eq!(
            verifier.accept_next(&candidate),
            Err(HeaderChainError::InvalidTimestamp {
                time: median / 2,
                median_time_past: median,
            })
        );
        assert_eq!(verifier.tip_height(), TIP);
    }

    #[test]
    fn test_timestamp_equal_to_median_is_allowed() {
        let (mut verifier, _) = verifier();
        let median = verifier.median_time_past().unwrap();
        let candidate = mine_on(verifier.store().tip(), median, EASY_BITS);
        verifier.accept_next(&candidate).unwrap();

        let median = verifier.median_time_past().unwrap();
        let candidate = mine_on(verifier.store().tip(), median - 1, EASY_BITS);
        assert!(matches!(
            verifier.accept_next(&candidate),
            Err(HeaderChainError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_invalid_proof_of_work_uses_parent_bits() {
        let (mut verifier, _) = verifier();
        let tip = *verifier.store().tip();
        let target = bits_to_target(tip.header.bits);

        // Claiming the easiest possible bits does not help; the parent's bits gate.
        let mut candidate = BlockHeader {
            version: 4,
            prev_block_hash: tip.hash,
            merkle_root: [0x55; 32],
            time: next_time(&verifier),
            bits: 0x2100ffff,
            nonce: 0,
        };
        while hash_meets_target(&candidate.compute_block_hash(), &target) {
            candidate.nonce += 1;
        }

        assert_eq!(
            verifier.accept_next(&candidate),
            Err(HeaderChainError::InvalidProofOfWork {
                hash: candidate.compute_block_hash(),
                bits: tip.header.bits,
            })
        );
        assert_eq!(verifier.tip_height(), TIP);
    }

    #[test]
    fn test_settlement_dispatch_after_six_confirmations() {
        let (mut verifier, sink) = verifier();
        let anchored = *verifier.store().entry_at(TIP).unwrap();

        for _ in 0..5 {
            let candidate = mine_on(verifier.store().tip(), next_time(&verifier), EASY_BITS);
            verifier.accept_next(&candidate).unwrap();
        }
        assert!(sink.notices().iter().all(|n| n.height < TIP));

        let candidate = mine_on(verifier.store().tip(), next_time(&verifier), EASY_BITS);
        verifier.accept_next(&candidate).unwrap();

        let notices = sink.notices();
        let for_tip: Vec<_> = notices.iter().filter(|n| n.height == TIP).collect();
        assert_eq!(for_tip.len(), 1);
        assert_eq!(for_tip[0].timestamp, anchored.header.time);
        assert_eq!(for_tip[0].difficulty(), bits_to_target(anchored.header.bits));
        assert_eq!(
            notices.iter().map(|n| n.height).collect::<Vec<_>>(),
            ((TIP - 5)..=TIP).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_settlement_target_unset() {
        let anchors = mine_chain(CHAIN_WINDOW_CAPACITY, [0u8; 32], START_TIME);
        let mut verifier =
            HeaderChainVerifier::<RecordingSettlementSink>::bootstrap(&anchors, TIP).unwrap();
        let before = verifier.store().clone();

        let candidate = mine_on(verifier.store().tip(), before.tip().header.time + 600, EASY_BITS);
        assert_eq!(
            verifier.accept_next(&candidate),
            Err(HeaderChainError::SettlementTargetUnset { height: TIP - 5 })
        );
        assert_eq!(verifier.store(), &before);
    }

    #[test]
    fn test_settlement_failure_aborts() {
        let anchors = mine_chain(CHAIN_WINDOW_CAPACITY, [0u8; 32], START_TIME);
        let mut verifier = HeaderChainVerifier::bootstrap(&anchors, TIP)
            .unwrap()
            .with_settlement_sink(FailingSettlementSink);
        let before = verifier.store().clone();

        let candidate = mine_on(verifier.store().tip(), before.tip().header.time + 600, EASY_BITS);
        assert!(matches!(
            verifier.accept_next(&candidate),
            Err(HeaderChainError::SettlementFailed { height, .. }) if height == TIP - 5
        ));
        assert_eq!(verifier.store(), &before);
    }

    #[test]
    fn test_accept_chain_extends_from_tip() {
        let (mut verifier, _) = verifier();
        let tip = *verifier.store().tip();
        let branch = mine_branch(&tip, 3, tip.header.time + 600);

        let events = verifier.accept_chain(&branch).unwrap();

        assert_eq!(verifier.tip_height(), TIP + 3);
        assert_eq!(events.len(), 3);
        assert!(events
            .iter()
            .all(|e| matches!(e, ChainEvent::HeaderAccepted { .. })));
    }

    #[test]
    fn test_accept_chain_reorg() {
        let (mut verifier, _) = verifier();
        let fork = *verifier.store().entry_at(TIP - 2).unwrap();
        let branch = mine_branch(&fork, 4, fork.header.time + 300);

        let events = verifier.accept_chain(&branch).unwrap();

        assert_eq!(verifier.tip_height(), TIP + 2);
        assert_eq!(verifier.store().tip().header, branch[3]);
        assert_eq!(
            events[0],
            ChainEvent::ChainReorged {
                merkle_root: branch[3].merkle_root
            }
        );
        assert_eq!(events.len(), 5);
        assert_eq!(
            verifier.store().entry_at(TIP - 1).unwrap().header,
            branch[0]
        );
        assert_eq!(verifier.store().find_ancestor(&fork.hash), Some(TIP - 2));
        verifier.store().check_consistency().unwrap();
    }

    #[test]
    fn test_reorg_does_not_resettle_heights() {
        let (mut verifier, sink) = verifier();
        for _ in 0..3 {
            let candidate = mine_on(verifier.store().tip(), next_time(&verifier), EASY_BITS);
            verifier.accept_next(&candidate).unwrap();
        }
        let settled_before = sink.notices().len();

        let fork = *verifier.store().entry_at(TIP + 1).unwrap();
        let branch = mine_branch(&fork, 3, fork.header.time + 300);
        verifier.accept_chain(&branch).unwrap();

        let notices = sink.notices();
        assert_eq!(notices.len(), settled_before + 1);
        let mut heights: Vec<u64> = notices.iter().map(|n| n.height).collect();
        heights.dedup();
        assert_eq!(heights.len(), notices.len());
    }

    #[test]
    fn test_chain_not_longer() {
        let (mut verifier, _) = verifier();
        let fork = *verifier.store().entry_at(TIP - 2).unwrap();
        let branch = mine_branch(&fork, 2, fork.header.time + 300);

        assert_eq!(
            verifier.accept_chain(&branch),
            Err(HeaderChainError::ChainNotLonger {
                fork_height: TIP - 2,
                branch_length: 2,
                tip_height: TIP,
            })
        );
        assert_eq!(verifier.tip_height(), TIP);
    }

    #[test]
    fn test_fork_point_not_found() {
        let (mut verifier, _) = verifier();
        for _ in 0..2 {
            let candidate = mine_on(verifier.store().tip(), next_time(&verifier), EASY_BITS);
            verifier.accept_next(&candidate).unwrap();
        }
        // The oldest anchors have been evicted from the window.
        let anchors = mine_chain(CHAIN_WINDOW_CAPACITY, [0u8; 32], START_TIME);
        let evicted = BlockHeader {
            version: 4,
            prev_block_hash: anchors[0].compute_block_hash(),
            merkle_root: [0x66; 32],
            time: START_TIME + 10_000,
            bits: EASY_BITS,
            nonce: 0,
        };

        assert_eq!(
            verifier.accept_chain(&[evicted]),
            Err(HeaderChainError::ForkPointNotFound {
                prev_block_hash: anchors[0].compute_block_hash(),
            })
        );
        assert_eq!(verifier.accept_chain(&[]), Err(HeaderChainError::EmptyChain));
    }

    #[test]
    fn test_deep_forks_resolve() {
        for depth in [7u64, 10, 16] {
            let (mut verifier, sink) = verifier();
            let start = next_time(&verifier);
            let fork = *verifier.store().entry_at(TIP - depth).unwrap();
            let branch = mine_branch(&fork, depth as usize + 1, start);

            let events = verifier.accept_chain(&branch).unwrap();

            assert_eq!(events.len(), depth as usize + 2);
            assert_eq!(verifier.tip_height(), TIP + 1);
            assert_eq!(verifier.store().tip().header, *branch.last().unwrap());
            assert_eq!(verifier.store().len(), CHAIN_WINDOW_CAPACITY);
            verifier.store().check_consistency().unwrap();

            // Only the new tip confirms a height that was not settled yet, and
            // that height now belongs to the branch.
            let notices = sink.notices();
            assert_eq!(notices.len(), 1);
            assert_eq!(notices[0].height, TIP - 5);
            assert_eq!(notices[0].timestamp, branch[depth as usize - 6].time);
        }
    }

    #[test]
    fn test_deepest_fork_checks_dropped_timestamps() {
        let (mut verifier, _) = verifier();
        let before = verifier.store().clone();
        let fork = *verifier.store().entry_at(TIP - 16).unwrap();
        let branch = mine_branch(&fork, 17, fork.header.time + 300);

        // The median window is the fork block plus the ten newest dropped
        // anchors, so the branch must not start below their median.
        let expected_median = (u64::from(START_TIME) * 2 + 21 * 600) / 2;
        assert_eq!(
            verifier.accept_chain(&branch),
            Err(HeaderChainError::InvalidTimestamp {
                time: fork.header.time + 300,
                median_time_past: expected_median as u32,
            })
        );
        assert_eq!(verifier.store(), &before);
    }

    #[test]
    fn test_accept_chain_is_atomic() {
        let (mut verifier, sink) = verifier();
        let before = verifier.store().clone();
        let tip = *verifier.store().tip();
        let mut branch = mine_branch(&tip, 5, tip.header.time + 600);

        // Break the third header; everything after it stays linked to it.
        branch[2].nonce = branch[2].nonce.wrapping_add(1);
        while hash_meets_target(
            &branch[2].compute_block_hash(),
            &bits_to_target(branch[1].bits),
        ) {
            branch[2].nonce = branch[2].nonce.wrapping_add(1);
        }
        branch[3].prev_block_hash = branch[2].compute_block_hash();

        assert!(matches!(
            verifier.accept_chain(&branch),
            Err(HeaderChainError::InvalidProofOfWork { .. })
        ));
        assert_eq!(verifier.store(), &before);
        assert_eq!(
            borsh::to_vec(verifier.store()).unwrap(),
            borsh::to_vec(&before).unwrap()
        );
        assert!(sink.notices().is_empty());
    }

    /// Three consecutive mainnet headers from August 2025, all at bits
    /// 0x17022cb3.
    const MAINNET_HEADERS: [[u8; 80]; 3] = [
        hex!("00800020e77cf8eb3114116cc2e6d4aca9b27d35bb5402a5054a010000000000000000005b41d83c40c8226c48807401b0b08aa8e4e2eb053bf91d580f62cd49f5c2a99f802ba468b32c0217cea24c34"),
        hex!("00606a3190af271dec0197c6b87f218070c5611cf0c506f6671c0200000000000000000021f21732014796558e6736b15de9b132ca65318b42fe5759b153c63dd4306e38842da468b32c021737421730"),
        hex!("000000264a14e21adad047d981c06a26446e345eda3d8beb807401000000000000000000fc01df2139954b36cebc3fa6fbf6a7160a67d34b67e5c4aa2a7ce46f5bb42a83642ea468b32c0217d14ba4d1"),
    ];
    const MAINNET_TIP: u64 = 911_000;

    /// Verifier whose tip is the first mainnet header. The slots behind it
    /// only carry timestamps one block interval apart, for the median.
    fn mainnet_verifier() -> (
        HeaderChainVerifier<RecordingSettlementSink>,
        [BlockHeader; 3],
    ) {
        let headers = MAINNET_HEADERS.map(|bytes| BlockHeader::from_wire_bytes(&bytes).unwrap());
        let tip = headers[0];

        let mut entries = [ChainEntry::default(); CHAIN_WINDOW_CAPACITY];
        for (i, entry) in entries.iter_mut().enumerate().take(CHAIN_WINDOW_CAPACITY - 1) {
            entry.header.time = tip.time - (CHAIN_WINDOW_CAPACITY - 1 - i) as u32 * 600;
            entry.header.bits = tip.bits;
        }
        entries[CHAIN_WINDOW_CAPACITY - 1] = ChainEntry {
            header: tip,
            hash: tip.compute_block_hash(),
            height: MAINNET_TIP,
        };
        let store = TrailingChainStore::from_raw_parts(
            entries,
            0,
            1,
            MAINNET_TIP,
            MAINNET_TIP - SETTLEMENT_DELAY,
        );

        let verifier = HeaderChainVerifier::from_store(store)
            .unwrap()
            .with_settlement_sink(RecordingSettlementSink::default());
        (verifier, headers)
    }

    #[test]
    fn test_mainnet_headers_at_real_difficulty() {
        let (mut verifier, [_, second, third]) = mainnet_verifier();

        let events = verifier.accept_next(&second).unwrap();
        assert_eq!(
            events,
            vec![ChainEvent::HeaderAccepted {
                hash: hex!("000000000000000000017480eb8b3dda5e346e44266ac081d947d0da1ae2144a"),
                timestamp: 1755590020,
                height: MAINNET_TIP + 1,
            }]
        );
        verifier.accept_next(&third).unwrap();

        assert_eq!(verifier.tip_height(), MAINNET_TIP + 2);
        assert_eq!(
            verifier.store().tip().hash,
            hex!("000000000000000000003379f29f2938129025576015e5574952b785b0618522")
        );
        verifier.store().check_consistency().unwrap();
    }

    #[test]
    fn test_mainnet_headers_rejections() {
        let (mut verifier, [first, second, third]) = mainnet_verifier();
        let before = verifier.store().clone();

        assert_eq!(
            verifier.accept_next(&third),
            Err(HeaderChainError::PrevBlockHashMismatch {
                expected: first.compute_block_hash(),
                got: third.prev_block_hash,
            })
        );

        // Median of the tip and the ten slots behind it.
        let median = first.time - 3300;
        assert_eq!(verifier.median_time_past(), Ok(median));
        let stale = BlockHeader {
            time: median - 1,
            ..second
        };
        assert_eq!(
            verifier.accept_next(&stale),
            Err(HeaderChainError::InvalidTimestamp {
                time: median - 1,
                median_time_past: median,
            })
        );
        assert_eq!(verifier.store(), &before);

        verifier.accept_next(&second).unwrap();
        let tampered = BlockHeader {
            nonce: third.nonce.wrapping_add(1),
            ..third
        };
        assert_eq!(
            verifier.accept_next(&tampered),
            Err(HeaderChainError::InvalidProofOfWork {
                hash: tampered.compute_block_hash(),
                bits: 0x17022cb3,
            })
        );
        assert_eq!(verifier.tip_height(), MAINNET_TIP + 1);
    }

    #[test]
    fn test_from_store_resumes() {
        let (mut verifier, _) = verifier();
        let candidate = mine_on(verifier.store().tip(), next_time(&verifier), EASY_BITS);
        verifier.accept_next(&candidate).unwrap();

        let mut resumed: HeaderChainVerifier<RecordingSettlementSink> =
            HeaderChainVerifier::from_store(verifier.store().clone()).unwrap();
        resumed.set_settlement_sink(RecordingSettlementSink::default());
        let candidate = mine_on(resumed.store().tip(), next_time(&resumed), EASY_BITS);
        resumed.accept_next(&candidate).unwrap();
        assert_eq!(resumed.tip_height(), TIP + 2);
    }
}
