//! # Outbound Ports
//!
//! Collaborators the sharders consume: peer-to-shard lookup and validator
//! membership. Both are owned by the host and may change between calls.

use crate::domain::{PeerId, PeerRole, ShardId};
use std::collections::HashSet;
use std::sync::Arc;

/// Peer shard resolver - outbound port.
///
/// Answers "which shard is this peer in?". Swappable at runtime through
/// `set_peer_shard_resolver`.
pub trait PeerShardResolver: Send + Sync {
    /// Shard of the given peer.
    fn by_id(&self, peer: &PeerId) -> ShardId;
}

/// Validator set - outbound port.
///
/// Needed only by the lists sharder to split validators from observers.
pub trait ValidatorSet: Send + Sync {
    /// Current role of the given peer.
    fn peer_role(&self, peer: &PeerId) -> PeerRole;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

type ShardFn = dyn Fn(&PeerId) -> ShardId + Send + Sync;

/// Function-backed resolver for tests and embedding.
#[derive(Clone)]
pub struct MockPeerShardResolver {
    resolve: Arc<ShardFn>,
}

impl MockPeerShardResolver {
    /// Resolve every peer through `f`.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&PeerId) -> ShardId + Send + Sync + 'static,
    {
        Self { resolve: Arc::new(f) }
    }

    /// Place every peer in `shard_id`.
    pub fn constant(shard_id: ShardId) -> Self {
        Self::from_fn(move |_| shard_id)
    }
}

impl Default for MockPeerShardResolver {
    fn default() -> Self {
        Self::constant(0)
    }
}

impl std::fmt::Debug for MockPeerShardResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockPeerShardResolver").finish_non_exhaustive()
    }
}

impl PeerShardResolver for MockPeerShardResolver {
    fn by_id(&self, peer: &PeerId) -> ShardId {
        (self.resolve)(peer)
    }
}

/// Fixed validator/observer membership.
#[derive(Clone, Debug, Default)]
pub struct StaticValidatorSet {
    /// Peers reported as validators.
    pub validators: HashSet<PeerId>,
    /// Peers reported as observers.
    pub observers: HashSet<PeerId>,
}

impl StaticValidatorSet {
    /// Build from explicit validator and observer lists.
    pub fn new(
        validators: impl IntoIterator<Item = PeerId>,
        observers: impl IntoIterator<Item = PeerId>,
    ) -> Self {
        Self {
            validators: validators.into_iter().collect(),
            observers: observers.into_iter().collect(),
        }
    }
}

impl ValidatorSet for StaticValidatorSet {
    fn peer_role(&self, peer: &PeerId) -> PeerRole {
        if self.validators.contains(peer) {
            PeerRole::Validator
        } else if self.observers.contains(peer) {
            PeerRole::Observer
        } else {
            PeerRole::Unknown
        }
    }
}
