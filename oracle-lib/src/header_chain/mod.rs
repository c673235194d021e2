//! # Header Chain
//! Bitcoin header chain verification: the header codec lives here, the rest
//! of the pipeline is split into submodules.
//!
//! - [`difficulty`]: compact `nBits` to full 256-bit target.
//! - [`median_time`]: median-time-past over the trailing window.
//! - [`store`]: fixed-capacity ring of the most recently accepted headers.
//! - [`engine`]: per-header validation and batched, reorganizing extension.
//! - [`settlement`]: outbound notification seam towards the settlement ledger.
//!
//! **⚠️ Warning:** This is not a full node. Scripts, transactions and merkle
//! proofs are never looked at; only the six header fields are.

use bitcoin::{
    block::{Header, Version},
    hashes::Hash,
    BlockHash, CompactTarget, TxMerkleNode,
};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::common::constants::HEADER_SIZE;
use crate::common::hashes::{calculate_double_sha256, reverse_bytes};
use crate::errors::HeaderChainError;

pub mod difficulty;
pub mod engine;
pub mod median_time;
pub mod settlement;
pub mod store;

/// A Bitcoin block header.
///
/// Hash fields are held big-endian, in the order block explorers display
/// them and in which they compare as 256-bit integers. Every field is
/// byte-reversed into little-endian wire order only when serialized.
///
/// ## Fields
///
/// * `version` - Block version
/// * `prev_block_hash` - Hash of the parent block, big-endian
/// * `merkle_root` - Transaction merkle root, big-endian
/// * `time` - Block timestamp as Unix time
/// * `bits` - Compact representation of the difficulty target
/// * `nonce` - Proof-of-work nonce
#[derive(
    Serialize,
    Deserialize,
    Eq,
    PartialEq,
    Clone,
    Copy,
    Debug,
    Default,
    Hash,
    BorshDeserialize,
    BorshSerialize,
)]
pub struct BlockHeader {
    pub version: i32,
    #[serde(with = "hex::serde")]
    pub prev_block_hash: [u8; 32],
    #[serde(with = "hex::serde")]
    pub merkle_root: [u8; 32],
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// Serializes the header into Bitcoin's 80-byte consensus encoding.
    ///
    /// Layout: `version`(4) `prev_block_hash`(32) `merkle_root`(32) `time`(4)
    /// `bits`(4) `nonce`(4), each field little-endian.
    pub fn to_wire_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut output = [0u8; HEADER_SIZE];
        output[0..4].copy_from_slice(&reverse_bytes(self.version.to_be_bytes()));
        output[4..36].copy_from_slice(&reverse_bytes(self.prev_block_hash));
        output[36..68].copy_from_slice(&reverse_bytes(self.merkle_root));
        output[68..72].copy_from_slice(&reverse_bytes(self.time.to_be_bytes()));
        output[72..76].copy_from_slice(&reverse_bytes(self.bits.to_be_bytes()));
        output[76..80].copy_from_slice(&reverse_bytes(self.nonce.to_be_bytes()));
        output
    }

    /// Parses an 80-byte consensus-encoded header.
    ///
    /// ## Errors
    ///
    /// Returns [`HeaderChainError::MalformedHeader`] if `input` is not exactly
    /// 80 bytes long.
    pub fn from_wire_bytes(input: &[u8]) -> Result<Self, HeaderChainError> {
        let input: &[u8; HEADER_SIZE] =
            input
                .try_into()
                .map_err(|_| HeaderChainError::MalformedHeader {
                    length: input.len(),
                })?;

        Ok(BlockHeader {
            version: i32::from_be_bytes(reverse_bytes(word_at(input, 0))),
            prev_block_hash: reverse_bytes(hash_at(input, 4)),
            merkle_root: reverse_bytes(hash_at(input, 36)),
            time: u32::from_be_bytes(reverse_bytes(word_at(input, 68))),
            bits: u32::from_be_bytes(reverse_bytes(word_at(input, 72))),
            nonce: u32::from_be_bytes(reverse_bytes(word_at(input, 76))),
        })
    }

    /// Parses a hex string holding an 80-byte consensus-encoded header, the
    /// format `getblockheader <hash> false` returns.
    pub fn from_hex(input: &str) -> Result<Self, HeaderChainError> {
        let bytes = hex::decode(input.trim()).map_err(|_| HeaderChainError::MalformedHeader {
            length: input.trim().len() / 2,
        })?;
        Self::from_wire_bytes(&bytes)
    }

    /// Hex form of [`BlockHeader::to_wire_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_wire_bytes())
    }

    /// Computes the block hash.
    ///
    /// Double SHA256 of the wire encoding, reversed back into big-endian so it
    /// can be compared to a target and to `prev_block_hash` fields directly.
    /// Bit-identical to Bitcoin Core's block hash.
    pub fn compute_block_hash(&self) -> [u8; 32] {
        reverse_bytes(calculate_double_sha256(&self.to_wire_bytes()))
    }
}

fn word_at(input: &[u8; HEADER_SIZE], offset: usize) -> [u8; 4] {
    let mut out = [0u8; 4];
    out.copy_from_slice(&input[offset..offset + 4]);
    out
}

fn hash_at(input: &[u8; HEADER_SIZE], offset: usize) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&input[offset..offset + 32]);
    out
}

impl From<Header> for BlockHeader {
    fn from(header: Header) -> Self {
        BlockHeader {
            version: header.version.to_consensus(),
            prev_block_hash: reverse_bytes(header.prev_blockhash.to_byte_array()),
            merkle_root: reverse_bytes(header.merkle_root.to_byte_array()),
            time: header.time,
            bits: header.bits.to_consensus(),
            nonce: header.nonce,
        }
    }
}

impl From<BlockHeader> for Header {
    fn from(val: BlockHeader) -> Self {
        Header {
            version: Version::from_consensus(val.version),
            prev_blockhash: BlockHash::from_byte_array(reverse_bytes(val.prev_block_hash)),
            merkle_root: TxMerkleNode::from_byte_array(reverse_bytes(val.merkle_root)),
            time: val.time,
            bits: CompactTarget::from_consensus(val.bits),
            nonce: val.nonce,
        }
    }
}
