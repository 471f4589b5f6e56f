//! Shard-agnostic single-list sharder ranked by Hamming distance.

use super::all_unknown;
use crate::algorithms::{evict, hamming_distance, into_peers, sort_by_distance};
use crate::domain::{
    invariant_min_connections, ConnectedPeersInfo, PeerId, ShardingError, SortingKey,
};
use crate::ports::PeerShardResolver;
use std::sync::Arc;
use tracing::debug;

/// One global list bounded by `max_peer_count`, blind to shards. Intended
/// for bootstrapping before shard information exists.
#[derive(Debug)]
pub struct OneListSharder {
    self_id: PeerId,
    max_peer_count: usize,
}

impl OneListSharder {
    /// Create a one-list sharder.
    ///
    /// # Errors
    ///
    /// [`ShardingError::InvalidValue`] if `max_peer_count` is below
    /// [`crate::domain::MIN_ALLOWED_CONNECTED_PEERS`].
    pub fn new(self_id: PeerId, max_peer_count: usize) -> Result<Self, ShardingError> {
        invariant_min_connections(max_peer_count)?;
        Ok(Self {
            self_id,
            max_peer_count,
        })
    }

    /// Peer budget.
    pub fn max_peer_count(&self) -> usize {
        self.max_peer_count
    }

    /// Peers ordered by ascending Hamming distance to `reference`.
    pub fn sort_list(&self, peers: &[PeerId], reference: &PeerId) -> Vec<PeerId> {
        let reference = SortingKey::for_peer(reference, 0);
        into_peers(sort_by_distance(peers, |peer| {
            hamming_distance(&reference, &SortingKey::for_peer(peer, 0))
        }))
    }

    /// The farthest peers beyond the peer budget.
    pub fn compute_eviction_list(&self, connected: &[PeerId]) -> Vec<PeerId> {
        let (_, evicted) = evict(self.sort_list(connected, &self.self_id), self.max_peer_count);

        debug!(
            "[qc-18] one-list: {} connected, {} to evict (max {})",
            connected.len(),
            evicted.len(),
            self.max_peer_count
        );
        evicted
    }

    /// Accepts any non-nil resolver; shard data is not used.
    pub fn set_peer_shard_resolver(
        &self,
        resolver: Option<Arc<dyn PeerShardResolver>>,
    ) -> Result<(), ShardingError> {
        resolver
            .map(|_| ())
            .ok_or(ShardingError::NilPeerShardResolver)
    }

    /// Every peer is reported as unknown.
    pub fn connected_peers_info(&self, connected: &[PeerId]) -> ConnectedPeersInfo {
        all_unknown(connected)
    }
}
