//! # QC-18 Peer Sharding
//!
//! Shard-aware peer retention for the networking layer.
//!
//! **Subsystem ID:** 18
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Decide which connected peers a node keeps and which it drops when the
//! connection budget is exceeded:
//! - XOR distance with a same-shard bias (Kademlia-style)
//! - Hamming distance for shard-blind bootstrapping
//! - Per-category bounds for validators and observers
//! - An explicit "sharding disabled" variant
//!
//! ## Strategies
//!
//! | Type | Ranking | Needs |
//! |------|---------|-------|
//! | `kademlia` | XOR, prio-bits masked | resolver |
//! | `simple-priority-bits` | XOR | - |
//! | `lists` | Hamming per category | resolver + validator set |
//! | `one-list` | Hamming | - |
//! | `nil-list` | none | - |
//!
//! ## Module Structure
//!
//! ```text
//! qc-18-peer-sharding/
//! ├── domain/          # PeerId, SortingKey, categories, config, errors
//! ├── algorithms/      # Distance metrics, sorting, eviction
//! ├── ports/           # PeerSharding API + resolver/validator traits
//! ├── sharders/        # The five strategies and the Sharder enum
//! ├── adapters/        # In-memory peer shard mapper
//! └── factory.rs       # Config → Sharder
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod factory;
pub mod ports;
pub mod sharders;

// Re-exports
pub use adapters::{PeerShardInfo, PeerShardMapper, MAX_PEER_IDS_PER_PUBLIC_KEY};
pub use algorithms::{
    evict, find_k_closest, hamming_distance, reset_distance_bits, sort_by_distance, xor_distance,
};
pub use domain::{
    ConnectedPeersInfo, PeerCategory, PeerCounts, PeerDistance, PeerId, PeerRole, ShardId,
    SharderVariant, ShardingConfig, ShardingError, SortingKey, METACHAIN_SHARD_ID,
    MIN_ALLOWED_CONNECTED_PEERS,
};
pub use factory::{new_sharder, SharderArgs};
pub use ports::{
    MockPeerShardResolver, PeerShardResolver, PeerSharding, StaticValidatorSet, ValidatorSet,
};
pub use sharders::{
    CategoryMaxima, KadSharder, ListsSharder, NilListSharder, OneListSharder, PrioBitsSharder,
    Sharder,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_semver() {
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert_eq!(parts.len(), 3, "{VERSION}");
        assert!(parts.iter().all(|p| p.parse::<u64>().is_ok()), "{VERSION}");
    }

    #[test]
    fn test_default_config_builds_disabled_sharder() {
        let sharder = new_sharder(SharderArgs::new(
            ShardingConfig::default(),
            PeerId::from("self"),
        ))
        .unwrap();
        assert_eq!(sharder.variant(), SharderVariant::NilList);
        assert!(sharder.compute_eviction_list(&[PeerId::from("a")]).is_empty());
    }
}
