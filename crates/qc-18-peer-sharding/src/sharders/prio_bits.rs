//! Simple priority-bits sharder: XOR ranking without shard bias.

use super::all_unknown;
use crate::algorithms::{evict, into_peers, sort_by_distance, xor_distance};
use crate::domain::{
    invariant_min_connections, ConnectedPeersInfo, PeerId, ShardingError, SortingKey,
};
use crate::ports::PeerShardResolver;
use std::sync::Arc;
use tracing::debug;

/// Keeps the `max_connection_count` peers closest to self by raw XOR
/// distance. Has no resolver dependency; used when shard information is
/// unavailable.
#[derive(Debug)]
pub struct PrioBitsSharder {
    self_id: PeerId,
    max_connection_count: usize,
}

impl PrioBitsSharder {
    /// Create a shard-blind XOR sharder.
    pub fn new(self_id: PeerId, max_connection_count: usize) -> Result<Self, ShardingError> {
        invariant_min_connections(max_connection_count)?;
        Ok(Self {
            self_id,
            max_connection_count,
        })
    }

    /// Connection budget.
    pub fn max_connection_count(&self) -> usize {
        self.max_connection_count
    }

    /// Peers ordered closest first relative to `reference`.
    pub fn sort_list(&self, peers: &[PeerId], reference: &PeerId) -> Vec<PeerId> {
        // Shard IDs are irrelevant without a bias.
        let reference = SortingKey::for_peer(reference, 0);
        into_peers(sort_by_distance(peers, |peer| {
            xor_distance(&reference, &SortingKey::for_peer(peer, 0), None)
        }))
    }

    /// The farthest peers beyond the connection budget.
    pub fn compute_eviction_list(&self, connected: &[PeerId]) -> Vec<PeerId> {
        let (_, evicted) = evict(
            self.sort_list(connected, &self.self_id),
            self.max_connection_count,
        );

        debug!(
            "[qc-18] simple-priority-bits: {} connected, {} to evict",
            connected.len(),
            evicted.len()
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockPeerShardResolver;

    fn make_peers(count: usize) -> Vec<PeerId> {
        (0..count).map(|i| PeerId::from(format!("NODE {i}").as_str())).collect()
    }

    #[test]
    fn test_new_small_budget_fails() {
        assert!(PrioBitsSharder::new(PeerId::from("self"), 1).is_err());
    }

    #[test]
    fn test_eviction_count() {
        let sharder = PrioBitsSharder::new(PeerId::from("self"), 5).unwrap();
        let peers = make_peers(12);
        let evicted = sharder.compute_eviction_list(&peers);
        assert_eq!(evicted.len(), 7);
        assert!(evicted.iter().all(|p| peers.contains(p)));
    }

    #[test]
    fn test_evicts_farthest() {
        let self_id = PeerId::from("self");
        let sharder = PrioBitsSharder::new(self_id.clone(), 5).unwrap();
        let peers = make_peers(12);

        let sorted = sharder.sort_list(&peers, &self_id);
        assert_eq!(sharder.compute_eviction_list(&peers), sorted[5..].to_vec());
    }

    #[test]
    fn test_set_resolver() {
        let sharder = PrioBitsSharder::new(PeerId::from("self"), 5).unwrap();
        assert!(sharder
            .set_peer_shard_resolver(Some(Arc::new(MockPeerShardResolver::constant(1))))
            .is_ok());
        assert_eq!(
            sharder.set_peer_shard_resolver(None),
            Err(ShardingError::NilPeerShardResolver)
        );
    }

    #[test]
    fn test_connected_peers_info_all_unknown() {
        let sharder = PrioBitsSharder::new(PeerId::from("self"), 5).unwrap();
        let info = sharder.connected_peers_info(&make_peers(3));
        assert_eq!(info.unknown.len(), 3);
        assert!(info.intra_shard.is_empty() && info.cross_shard.is_empty());
    }
}
