//! Compact target (`nBits`) decoding.

use crypto_bigint::{Encoding, U256};

/// Converts compact target representation (bits) to the full 256-bit target.
///
/// ## Compact Target Format
///
/// - Bits 24-31: exponent, the byte length of the target
/// - Bits 0-23: coefficient, the three most significant bytes
///
/// For `exponent <= 3` the coefficient is shifted right, dropping low bytes;
/// otherwise it is shifted left by `8 * (exponent - 3)` bits. Bits shifted past
/// the 256th are discarded. The coefficient's top bit is not treated as a sign,
/// so the result may differ from Bitcoin Core for such encodings, which never
/// appear in valid mainnet headers.
pub fn bits_to_target(bits: u32) -> U256 {
    let exponent = (bits >> 24) as usize;
    let coefficient = bits & 0x00ff_ffff;

    if exponent <= 3 {
        U256::from(coefficient >> (8 * (3 - exponent)))
    } else {
        let shift = 8 * (exponent - 3);
        if shift >= U256::BITS {
            return U256::ZERO;
        }
        U256::from(coefficient).shl_vartime(shift)
    }
}

/// Big-endian byte form of [`bits_to_target`].
pub fn bits_to_target_bytes(bits: u32) -> [u8; 32] {
    bits_to_target(bits).to_be_bytes()
}

/// Checks that a big-endian block hash is strictly below `target`.
pub fn hash_meets_target(hash: &[u8; 32], target: &U256) -> bool {
    U256::from_be_bytes(*hash) < *target
}
