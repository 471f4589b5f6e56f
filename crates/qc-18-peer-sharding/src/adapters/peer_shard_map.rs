//! # In-Memory Peer Shard Mapper
//!
//! Resolves a peer to its shard and role from three sources, in order:
//!
//! 1. the validator table (public key → shard), refreshed every epoch
//! 2. the observer fallback keyed by public key
//! 3. the observer fallback keyed by peer ID
//!
//! A peer must first be linked to a public key; an unlinked peer is always
//! reported as unknown in shard 0.

use crate::domain::{PeerId, PeerRole, ShardId};
use crate::ports::{PeerShardResolver, ValidatorSet};
use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Most peer IDs remembered for a single public key.
pub const MAX_PEER_IDS_PER_PUBLIC_KEY: usize = 3;

/// Public key bytes of a node.
pub type PublicKey = Vec<u8>;

/// Resolved shard and role of a peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeerShardInfo {
    /// Role of the peer.
    pub role: PeerRole,
    /// Shard of the peer, 0 when unknown.
    pub shard_id: ShardId,
}

impl PeerShardInfo {
    const UNKNOWN: Self = Self {
        role: PeerRole::Unknown,
        shard_id: 0,
    };
}

#[derive(Default)]
struct MapperState {
    peer_public_key: HashMap<PeerId, PublicKey>,
    public_key_peers: HashMap<PublicKey, VecDeque<PeerId>>,
    validator_shard: HashMap<PublicKey, ShardId>,
    fallback_public_key_shard: HashMap<PublicKey, ShardId>,
    fallback_peer_shard: HashMap<PeerId, ShardId>,
}

impl MapperState {
    fn unlink_peer(&mut self, peer: &PeerId, public_key: &PublicKey) {
        if let Some(peers) = self.public_key_peers.get_mut(public_key) {
            peers.retain(|p| p != peer);
            if peers.is_empty() {
                self.public_key_peers.remove(public_key);
            }
        }
    }
}

/// Thread-safe peer → shard mapper usable as both resolver and validator set.
#[derive(Default)]
pub struct PeerShardMapper {
    state: RwLock<MapperState>,
}

impl PeerShardMapper {
    /// Create an empty mapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Link `peer` to `public_key`.
    ///
    /// A peer linked to another key is moved. When a key accumulates more
    /// than [`MAX_PEER_IDS_PER_PUBLIC_KEY`] peers the oldest is forgotten.
    pub fn update_peer_public_key(&self, peer: PeerId, public_key: PublicKey) {
        let mut state = self.state.write();

        if let Some(previous) = state.peer_public_key.get(&peer).cloned() {
            if previous == public_key {
                return;
            }
            state.unlink_peer(&peer, &previous);
        }

        state.peer_public_key.insert(peer.clone(), public_key.clone());
        let peers = state.public_key_peers.entry(public_key).or_default();
        peers.push_back(peer);

        let mut trimmed = Vec::new();
        while peers.len() > MAX_PEER_IDS_PER_PUBLIC_KEY {
            if let Some(oldest) = peers.pop_front() {
                trimmed.push(oldest);
            }
        }
        for oldest in trimmed {
            debug!("[qc-18] Trimmed peer {} from public key", oldest);
            state.peer_public_key.remove(&oldest);
        }
    }

    /// Record the shard of a validator's public key.
    pub fn update_validator(&self, public_key: PublicKey, shard_id: ShardId) {
        self.state.write().validator_shard.insert(public_key, shard_id);
    }

    /// Record the shard announced for an observer's public key.
    pub fn update_public_key_shard(&self, public_key: PublicKey, shard_id: ShardId) {
        self.state
            .write()
            .fallback_public_key_shard
            .insert(public_key, shard_id);
    }

    /// Record the shard announced for an observer's peer ID.
    pub fn update_peer_shard(&self, peer: PeerId, shard_id: ShardId) {
        self.state.write().fallback_peer_shard.insert(peer, shard_id);
    }

    /// Forget every validator entry, e.g. on an epoch change.
    pub fn clear_validators(&self) {
        let mut state = self.state.write();
        debug!(
            "[qc-18] Clearing {} validator entries",
            state.validator_shard.len()
        );
        state.validator_shard.clear();
    }

    /// Public key linked to `peer`.
    pub fn public_key(&self, peer: &PeerId) -> Option<PublicKey> {
        self.state.read().peer_public_key.get(peer).cloned()
    }

    /// Peers linked to `public_key`, oldest first.
    pub fn peers_for_public_key(&self, public_key: &[u8]) -> Vec<PeerId> {
        self.state
            .read()
            .public_key_peers
            .get(public_key)
            .map(|peers| peers.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Shard and role of `peer`.
    pub fn peer_info(&self, peer: &PeerId) -> PeerShardInfo {
        let state = self.state.read();
        let Some(public_key) = state.peer_public_key.get(peer) else {
            return PeerShardInfo::UNKNOWN;
        };

        if let Some(&shard_id) = state.validator_shard.get(public_key) {
            return PeerShardInfo {
                role: PeerRole::Validator,
                shard_id,
            };
        }

        state
            .fallback_public_key_shard
            .get(public_key)
            .or_else(|| state.fallback_peer_shard.get(peer))
            .map(|&shard_id| PeerShardInfo {
                role: PeerRole::Observer,
                shard_id,
            })
            .unwrap_or(PeerShardInfo::UNKNOWN)
    }
}

impl std::fmt::Debug for PeerShardMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("PeerShardMapper")
            .field("peers", &state.peer_public_key.len())
            .field("validators", &state.validator_shard.len())
            .finish_non_exhaustive()
    }
}

impl PeerShardResolver for PeerShardMapper {
    fn by_id(&self, peer: &PeerId) -> ShardId {
        self.peer_info(peer).shard_id
    }
}

impl ValidatorSet for PeerShardMapper {
    fn peer_role(&self, peer: &PeerId) -> PeerRole {
        self.peer_info(peer).role
    }
}
