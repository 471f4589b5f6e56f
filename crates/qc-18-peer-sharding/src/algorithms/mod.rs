//! # Algorithms Module
//!
//! Pure functions shared by every sharder: distance metrics, ranking and
//! eviction. No I/O, no state, deterministic for a fixed input.

mod distance;
mod eviction;
mod sorting;

pub use distance::{hamming_distance, reset_distance_bits, xor_bytes, xor_distance};
pub use eviction::evict;
pub use sorting::{find_k_closest, into_peers, sort_by_distance};
