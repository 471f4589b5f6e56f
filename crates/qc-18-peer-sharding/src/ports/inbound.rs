//! # Inbound Ports
//!
//! What the networking layer can ask of a sharder.

use super::outbound::PeerShardResolver;
use crate::domain::{ConnectedPeersInfo, PeerId, SharderVariant, ShardingError};
use std::sync::Arc;

/// Peer sharding API - inbound port.
///
/// All methods except `set_peer_shard_resolver` are total: they never fail
/// and never return a peer absent from their input.
pub trait PeerSharding: Send + Sync {
    /// Peers to disconnect so the connected set respects the configured bounds.
    fn compute_eviction_list(&self, connected: &[PeerId]) -> Vec<PeerId>;

    /// Peers ordered closest first relative to `reference`.
    fn sort_list(&self, peers: &[PeerId], reference: &PeerId) -> Vec<PeerId>;

    /// True if `peer` is in `list`.
    fn has(&self, peer: &PeerId, list: &[PeerId]) -> bool;

    /// Swap the peer shard resolver. `None` is rejected and the previous
    /// resolver stays active.
    fn set_peer_shard_resolver(
        &self,
        resolver: Option<Arc<dyn PeerShardResolver>>,
    ) -> Result<(), ShardingError>;

    /// Split connected peers by shard locality.
    fn connected_peers_info(&self, connected: &[PeerId]) -> ConnectedPeersInfo;

    /// Strategy backing this sharder.
    fn variant(&self) -> SharderVariant;

    /// The `k` peers closest to `reference`.
    fn find_k_closest(&self, peers: &[PeerId], reference: &PeerId, k: usize) -> Vec<PeerId> {
        let mut sorted = self.sort_list(peers, reference);
        sorted.truncate(k);
        sorted
    }
}
