//! # Domain Value Objects
//!
//! Immutable value types for network sharding.

use super::errors::ShardId;
use primitive_types::U256;
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque network participant identity.
///
/// Compared only by byte equality and never mutated after creation.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(Vec<u8>);

impl PeerId {
    /// Create a peer ID from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw identity bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of identity bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the identity carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PeerId {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl From<Vec<u8>> for PeerId {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", hex::encode(&self.0))
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

/// Operand of a distance computation.
///
/// Derived per peer on every call since the resolver may have changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortingKey {
    /// SHA-256 of the peer identity bytes.
    pub key: [u8; 32],
    /// Shard the peer resolved to at derivation time.
    pub shard_id: ShardId,
}

impl SortingKey {
    /// Build a sorting key from precomputed key bytes.
    pub fn new(key: [u8; 32], shard_id: ShardId) -> Self {
        Self { key, shard_id }
    }

    /// Derive the sorting key of a peer in the given shard.
    pub fn for_peer(peer: &PeerId, shard_id: ShardId) -> Self {
        let digest = Sha256::digest(peer.as_bytes());
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self { key, shard_id }
    }
}

/// A peer with its distance to some reference identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerDistance {
    /// The ranked peer.
    pub peer: PeerId,
    /// Distance to the reference (lower is closer).
    pub distance: U256,
}

impl PeerDistance {
    /// Pair a peer with its distance.
    pub fn new(peer: PeerId, distance: U256) -> Self {
        Self { peer, distance }
    }
}

/// Role of a peer as reported by the validator set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PeerRole {
    /// Peer belongs to the current validator set.
    Validator,
    /// Peer is known but does not validate.
    Observer,
    /// Peer could not be classified.
    #[default]
    Unknown,
}

/// Bucket a connected peer falls into for the lists sharder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PeerCategory {
    /// Validator in our own shard.
    IntraShardValidator,
    /// Validator in another shard.
    CrossShardValidator,
    /// Observer in our own shard.
    IntraShardObserver,
    /// Observer in another shard.
    CrossShardObserver,
    /// Unclassified peer, first to go under pressure.
    Unknown,
}

impl PeerCategory {
    /// All categories in eviction-evaluation order. Unknown comes last so it
    /// only receives the capacity the classified categories left over.
    pub const ALL: [PeerCategory; 5] = [
        Self::IntraShardValidator,
        Self::CrossShardValidator,
        Self::IntraShardObserver,
        Self::CrossShardObserver,
        Self::Unknown,
    ];

    /// Classify a peer from its role and whether it shares our shard.
    pub fn classify(role: PeerRole, same_shard: bool) -> Self {
        match (role, same_shard) {
            (PeerRole::Validator, true) => Self::IntraShardValidator,
            (PeerRole::Validator, false) => Self::CrossShardValidator,
            (PeerRole::Observer, true) => Self::IntraShardObserver,
            (PeerRole::Observer, false) => Self::CrossShardObserver,
            (PeerRole::Unknown, _) => Self::Unknown,
        }
    }

    /// Position inside [`PeerCategory::ALL`].
    pub fn index(&self) -> usize {
        match self {
            Self::IntraShardValidator => 0,
            Self::CrossShardValidator => 1,
            Self::IntraShardObserver => 2,
            Self::CrossShardObserver => 3,
            Self::Unknown => 4,
        }
    }
}

/// Connected peers split by shard locality.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectedPeersInfo {
    /// Peers whose shard is not known to us.
    pub unknown: Vec<PeerId>,
    /// Peers in our shard.
    pub intra_shard: Vec<PeerId>,
    /// Peers in other shards.
    pub cross_shard: Vec<PeerId>,
}

impl ConnectedPeersInfo {
    /// Counts per locality.
    pub fn counts(&self) -> PeerCounts {
        PeerCounts {
            unknown: self.unknown.len(),
            intra_shard: self.intra_shard.len(),
            cross_shard: self.cross_shard.len(),
        }
    }
}

/// Count summary of [`ConnectedPeersInfo`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeerCounts {
    /// Peers whose shard is not known to us.
    pub unknown: usize,
    /// Peers in our shard.
    pub intra_shard: usize,
    /// Peers in other shards.
    pub cross_shard: usize,
}

impl PeerCounts {
    /// Sum over all localities.
    pub fn total(&self) -> usize {
        self.unknown + self.intra_shard + self.cross_shard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peer_id_equality_is_bytewise() {
        assert_eq!(PeerId::from("node"), PeerId::new(b"node".to_vec()));
        assert_ne!(PeerId::from("node"), PeerId::from("Node"));
    }

    #[test]
    fn test_peer_id_display_is_hex() {
        assert_eq!(PeerId::new(vec![0xab, 0x01]).to_string(), "ab01");
    }

    #[test]
    fn test_sorting_key_is_deterministic() {
        let peer = PeerId::from("NODE 1");
        assert_eq!(SortingKey::for_peer(&peer, 2), SortingKey::for_peer(&peer, 2));
        assert_ne!(
            SortingKey::for_peer(&peer, 2).key,
            SortingKey::for_peer(&PeerId::from("NODE 2"), 2).key
        );
    }

    #[test]
    fn test_classify_categories() {
        assert_eq!(
            PeerCategory::classify(PeerRole::Validator, true),
            PeerCategory::IntraShardValidator
        );
        assert_eq!(
            PeerCategory::classify(PeerRole::Observer, false),
            PeerCategory::CrossShardObserver
        );
        assert_eq!(PeerCategory::classify(PeerRole::Unknown, true), PeerCategory::Unknown);
    }

    #[test]
    fn test_category_index_matches_all() {
        for (i, category) in PeerCategory::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
    }

    #[test]
    fn test_peer_counts_total() {
        let info = ConnectedPeersInfo {
            unknown: vec![PeerId::from("a")],
            intra_shard: vec![PeerId::from("b"), PeerId::from("c")],
            cross_shard: vec![],
        };
        assert_eq!(info.counts().total(), 3);
    }
}
