use sha2::{Digest, Sha256};

pub fn calculate_double_sha256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::default();
    hasher.update(input);
    let result = hasher.finalize_reset();
    hasher.update(result);
    hasher.finalize().into()
}

/// Reverses the byte order of a fixed-width value.
///
/// Header fields are stored big-endian and written to the wire little-endian,
/// so this is applied once on the way out and once on the way back in.
pub const fn reverse_bytes<const N: usize>(input: [u8; N]) -> [u8; N] {
    let mut output = [0u8; N];
    let mut i = 0;
    while i < N {
        output[i] = input[N - 1 - i];
        i += 1;
    }
    output
}
