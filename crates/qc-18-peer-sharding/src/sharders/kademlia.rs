//! Kademlia-biased single-list sharder.

use super::{split_by_locality, ResolverSlot};
use crate::algorithms::{evict, into_peers, sort_by_distance, xor_distance};
use crate::domain::{
    invariant_min_connections, invariant_prio_bits, ConnectedPeersInfo, PeerId, ShardingError,
    SortingKey,
};
use crate::ports::PeerShardResolver;
use primitive_types::U256;
use std::sync::Arc;
use tracing::debug;

/// Keeps the `max_connection_count` peers closest to self under the
/// shard-biased XOR metric. Same-shard peers have the leading `prio_bits`
/// bits of their distance cleared, so they are retained ahead of cross-shard
/// peers with similar keys.
#[derive(Debug)]
pub struct KadSharder {
    self_id: PeerId,
    prio_bits: u8,
    max_connection_count: usize,
    resolver: ResolverSlot,
}

impl KadSharder {
    /// Create a Kademlia sharder.
    ///
    /// # Errors
    ///
    /// - [`ShardingError::BadParams`] if `prio_bits` is zero
    /// - [`ShardingError::NilPeerShardResolver`] if no resolver is given
    /// - [`ShardingError::InvalidValue`] if the connection budget is too small
    pub fn new(
        self_id: PeerId,
        prio_bits: u32,
        max_connection_count: usize,
        resolver: Option<Arc<dyn PeerShardResolver>>,
    ) -> Result<Self, ShardingError> {
        let prio_bits = invariant_prio_bits(prio_bits)?;
        let resolver = resolver.ok_or(ShardingError::NilPeerShardResolver)?;
        invariant_min_connections(max_connection_count)?;

        Ok(Self {
            self_id,
            prio_bits,
            max_connection_count,
            resolver: ResolverSlot::new(resolver),
        })
    }

    /// Effective priority bits after clamping.
    pub fn prio_bits(&self) -> u8 {
        self.prio_bits
    }

    /// Connection budget.
    pub fn max_connection_count(&self) -> usize {
        self.max_connection_count
    }

    /// Shard-biased distance between two peers under the current resolver.
    pub fn distance(&self, a: &PeerId, b: &PeerId) -> U256 {
        let resolver = self.resolver.get();
        let ka = SortingKey::for_peer(a, resolver.by_id(a));
        let kb = SortingKey::for_peer(b, resolver.by_id(b));
        xor_distance(&ka, &kb, Some(self.prio_bits))
    }

    /// Peers ordered closest first relative to `reference`.
    pub fn sort_list(&self, peers: &[PeerId], reference: &PeerId) -> Vec<PeerId> {
        let resolver = self.resolver.get();
        let reference = SortingKey::for_peer(reference, resolver.by_id(reference));

        into_peers(sort_by_distance(peers, |peer| {
            let key = SortingKey::for_peer(peer, resolver.by_id(peer));
            xor_distance(&reference, &key, Some(self.prio_bits))
        }))
    }

    /// The farthest peers beyond the connection budget.
    pub fn compute_eviction_list(&self, connected: &[PeerId]) -> Vec<PeerId> {
        let sorted = self.sort_list(connected, &self.self_id);
        let (_, evicted) = evict(sorted, self.max_connection_count);

        debug!(
            "[qc-18] kademlia: {} connected, {} to evict (max {})",
            connected.len(),
            evicted.len(),
            self.max_connection_count
        );
        evicted
    }

    /// Swap the resolver; `None` keeps the current one.
    pub fn set_peer_shard_resolver(
        &self,
        resolver: Option<Arc<dyn PeerShardResolver>>,
    ) -> Result<(), ShardingError> {
        self.resolver.set(resolver)
    }

    /// Connected peers split into intra- and cross-shard.
    pub fn connected_peers_info(&self, connected: &[PeerId]) -> ConnectedPeersInfo {
        split_by_locality(self.resolver.get().as_ref(), &self.self_id, connected)
    }
}
