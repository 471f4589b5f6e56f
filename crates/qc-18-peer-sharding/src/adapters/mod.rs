//! # Adapters Layer (Hexagonal Architecture)
//!
//! Concrete implementations of the outbound ports for hosts that do not bring
//! their own shard directory.

mod peer_shard_map;

pub use peer_shard_map::{PeerShardInfo, PeerShardMapper, PublicKey, MAX_PEER_IDS_PER_PUBLIC_KEY};
