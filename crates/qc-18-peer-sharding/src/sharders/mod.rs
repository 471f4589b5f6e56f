//! # Sharder Variants
//!
//! Five interchangeable retention strategies behind the [`PeerSharding`]
//! port. The set is closed, so dispatch is a plain `match` over [`Sharder`].
//!
//! | Variant | Ranking | Shard-aware |
//! |---------|---------|-------------|
//! | `kademlia` | XOR with prio-bits bias | yes |
//! | `simple-priority-bits` | raw XOR | no |
//! | `lists` | Hamming, per category | yes |
//! | `one-list` | Hamming | no |
//! | `nil-list` | none | no |

mod kademlia;
mod lists;
mod nil_list;
mod one_list;
mod prio_bits;
mod resolver_slot;

pub use kademlia::KadSharder;
pub use lists::{CategoryEviction, CategoryMaxima, ListsSharder};
pub use nil_list::NilListSharder;
pub use one_list::OneListSharder;
pub use prio_bits::PrioBitsSharder;
pub use resolver_slot::ResolverSlot;

use crate::domain::{ConnectedPeersInfo, PeerId, SharderVariant, ShardingError};
use crate::ports::{PeerShardResolver, PeerSharding};
use std::sync::Arc;

/// Split peers into intra- and cross-shard relative to `self_id`.
pub(crate) fn split_by_locality(
    resolver: &dyn PeerShardResolver,
    self_id: &PeerId,
    connected: &[PeerId],
) -> ConnectedPeersInfo {
    let self_shard = resolver.by_id(self_id);
    let (intra_shard, cross_shard) = connected
        .iter()
        .cloned()
        .partition(|peer| resolver.by_id(peer) == self_shard);

    ConnectedPeersInfo {
        unknown: Vec::new(),
        intra_shard,
        cross_shard,
    }
}

/// Report every peer as unknown.
pub(crate) fn all_unknown(connected: &[PeerId]) -> ConnectedPeersInfo {
    ConnectedPeersInfo {
        unknown: connected.to_vec(),
        ..Default::default()
    }
}

/// A configured sharder.
#[derive(Debug)]
pub enum Sharder {
    /// Shard-biased XOR.
    Kademlia(KadSharder),
    /// Unbiased XOR.
    SimplePriorityBits(PrioBitsSharder),
    /// Per-category lists.
    Lists(ListsSharder),
    /// Shard-blind Hamming.
    OneList(OneListSharder),
    /// Disabled.
    NilList(NilListSharder),
}

impl PeerSharding for Sharder {
    fn compute_eviction_list(&self, connected: &[PeerId]) -> Vec<PeerId> {
        match self {
            Self::Kademlia(s) => s.compute_eviction_list(connected),
            Self::SimplePriorityBits(s) => s.compute_eviction_list(connected),
            Self::Lists(s) => s.compute_eviction_list(connected),
            Self::OneList(s) => s.compute_eviction_list(connected),
            Self::NilList(s) => s.compute_eviction_list(connected),
        }
    }

    fn sort_list(&self, peers: &[PeerId], reference: &PeerId) -> Vec<PeerId> {
        match self {
            Self::Kademlia(s) => s.sort_list(peers, reference),
            Self::SimplePriorityBits(s) => s.sort_list(peers, reference),
            Self::Lists(s) => s.sort_list(peers, reference),
            Self::OneList(s) => s.sort_list(peers, reference),
            Self::NilList(s) => s.sort_list(peers, reference),
        }
    }

    fn has(&self, peer: &PeerId, list: &[PeerId]) -> bool {
        match self {
            // Sharding disabled: no membership is ever reported.
            Self::NilList(_) => false,
            _ => list.contains(peer),
        }
    }

    fn set_peer_shard_resolver(
        &self,
        resolver: Option<Arc<dyn PeerShardResolver>>,
    ) -> Result<(), ShardingError> {
        match self {
            Self::Kademlia(s) => s.set_peer_shard_resolver(resolver),
            Self::SimplePriorityBits(s) => s.set_peer_shard_resolver(resolver),
            Self::Lists(s) => s.set_peer_shard_resolver(resolver),
            Self::OneList(s) => s.set_peer_shard_resolver(resolver),
            Self::NilList(_) => Ok(()),
        }
    }

    fn connected_peers_info(&self, connected: &[PeerId]) -> ConnectedPeersInfo {
        match self {
            Self::Kademlia(s) => s.connected_peers_info(connected),
            Self::SimplePriorityBits(s) => s.connected_peers_info(connected),
            Self::Lists(s) => s.connected_peers_info(connected),
            Self::OneList(s) => s.connected_peers_info(connected),
            Self::NilList(s) => s.connected_peers_info(connected),
        }
    }

    fn variant(&self) -> SharderVariant {
        match self {
            Self::Kademlia(_) => SharderVariant::Kademlia,
            Self::SimplePriorityBits(_) => SharderVariant::SimplePriorityBits,
            Self::Lists(_) => SharderVariant::Lists,
            Self::OneList(_) => SharderVariant::OneList,
            Self::NilList(_) => SharderVariant::NilList,
        }
    }
}
