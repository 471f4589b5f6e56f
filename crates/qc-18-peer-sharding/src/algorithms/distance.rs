//! Peer distance metrics.

use crate::domain::SortingKey;
use primitive_types::U256;

/// Bytewise XOR of two sorting keys.
pub fn xor_bytes(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let mut out = [0u8; 32];
    for (o, (x, y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        *o = x ^ y;
    }
    out
}

/// Zero the leading `prio_bits` bits of the first byte of a distance.
///
/// `prio_bits >= 8` clears the entire first byte.
pub fn reset_distance_bits(distance: &mut [u8], prio_bits: u8) {
    if let Some(first) = distance.first_mut() {
        let mask = 0xffu8.checked_shr(u32::from(prio_bits)).unwrap_or(0);
        *first &= mask;
    }
}

/// XOR distance interpreted as a big-endian unsigned integer.
///
/// With `prio_bits` set and both keys in the same shard, the result is
/// masked by [`reset_distance_bits`] so same-shard peers rank closer.
/// Symmetric in `a` and `b`.
pub fn xor_distance(a: &SortingKey, b: &SortingKey, prio_bits: Option<u8>) -> U256 {
    let mut distance = xor_bytes(&a.key, &b.key);
    if let Some(bits) = prio_bits {
        if a.shard_id == b.shard_id {
            reset_distance_bits(&mut distance, bits);
        }
    }
    U256::from_big_endian(&distance)
}

/// Number of differing bits between two keys. Ignores shard membership.
pub fn hamming_distance(a: &SortingKey, b: &SortingKey) -> U256 {
    let bits: u32 = xor_bytes(&a.key, &b.key)
        .iter()
        .map(|byte| byte.count_ones())
        .sum();
    U256::from(bits)
}
