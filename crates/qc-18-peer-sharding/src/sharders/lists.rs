//! Category-bucketed (lists) sharder.
//!
//! Every connected peer is classified into one of five categories from its
//! shard and validator role. Each classified category is trimmed against its
//! own maximum; the unknown category then receives whatever part of the
//! connection budget the others left unused, so unclassified peers are the
//! first to go under pressure.

use super::ResolverSlot;
use crate::algorithms::{evict, hamming_distance, into_peers, sort_by_distance};
use crate::domain::{
    invariant_category_budget, invariant_min_connections, ConnectedPeersInfo, PeerCategory,
    PeerId, ShardingError, SortingKey,
};
use crate::ports::{PeerShardResolver, ValidatorSet};
use std::sync::Arc;
use tracing::debug;

/// Per-category maxima of the lists sharder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryMaxima {
    /// Validators in our shard.
    pub intra_shard_validators: usize,
    /// Validators in other shards.
    pub cross_shard_validators: usize,
    /// Observers in our shard.
    pub intra_shard_observers: usize,
    /// Observers in other shards.
    pub cross_shard_observers: usize,
}

impl CategoryMaxima {
    /// Maximum for a classified category.
    ///
    /// Unknown has no fixed bound: it receives the budget the classified
    /// categories left unused, so under full pressure it keeps at most
    /// `max_connection_count - sum(maxima)` peers.
    pub fn for_category(&self, category: PeerCategory) -> Option<usize> {
        match category {
            PeerCategory::IntraShardValidator => Some(self.intra_shard_validators),
            PeerCategory::CrossShardValidator => Some(self.cross_shard_validators),
            PeerCategory::IntraShardObserver => Some(self.intra_shard_observers),
            PeerCategory::CrossShardObserver => Some(self.cross_shard_observers),
            PeerCategory::Unknown => None,
        }
    }

    fn as_array(&self) -> [usize; 4] {
        [
            self.intra_shard_validators,
            self.cross_shard_validators,
            self.intra_shard_observers,
            self.cross_shard_observers,
        ]
    }
}

/// Eviction result for a single category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryEviction {
    /// Category the peers belong to.
    pub category: PeerCategory,
    /// Capacity applied to this category.
    pub capacity: usize,
    /// Peers retained, closest first.
    pub kept: Vec<PeerId>,
    /// Peers to disconnect.
    pub evicted: Vec<PeerId>,
}

/// Multi-list sharder with independent per-category bounds.
pub struct ListsSharder {
    self_id: PeerId,
    max_connection_count: usize,
    maxima: CategoryMaxima,
    resolver: ResolverSlot,
    validators: Arc<dyn ValidatorSet>,
}

impl std::fmt::Debug for ListsSharder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListsSharder")
            .field("self_id", &self.self_id)
            .field("max_connection_count", &self.max_connection_count)
            .field("maxima", &self.maxima)
            .finish_non_exhaustive()
    }
}

impl ListsSharder {
    /// Create a lists sharder.
    ///
    /// # Errors
    ///
    /// - [`ShardingError::NilPeerShardResolver`] / [`ShardingError::NilValidatorSet`]
    ///   if a collaborator is missing
    /// - [`ShardingError::InvalidValue`] if the connection budget is too small
    /// - [`ShardingError::CategoryBudgetExceeded`] if the maxima exceed the budget
    pub fn new(
        self_id: PeerId,
        max_connection_count: usize,
        maxima: CategoryMaxima,
        resolver: Option<Arc<dyn PeerShardResolver>>,
        validators: Option<Arc<dyn ValidatorSet>>,
    ) -> Result<Self, ShardingError> {
        let resolver = resolver.ok_or(ShardingError::NilPeerShardResolver)?;
        let validators = validators.ok_or(ShardingError::NilValidatorSet)?;
        invariant_min_connections(max_connection_count)?;
        invariant_category_budget(&maxima.as_array(), max_connection_count)?;

        Ok(Self {
            self_id,
            max_connection_count,
            maxima,
            resolver: ResolverSlot::new(resolver),
            validators,
        })
    }

    /// Configured category maxima.
    pub fn maxima(&self) -> CategoryMaxima {
        self.maxima
    }

    /// Connection budget shared by all categories.
    pub fn max_connection_count(&self) -> usize {
        self.max_connection_count
    }

    /// Category of a peer under the current resolver and validator set.
    pub fn category_of(&self, peer: &PeerId) -> PeerCategory {
        let resolver = self.resolver.get();
        let self_shard = resolver.by_id(&self.self_id);
        self.classify(resolver.as_ref(), self_shard, peer)
    }

    fn classify(
        &self,
        resolver: &dyn PeerShardResolver,
        self_shard: u32,
        peer: &PeerId,
    ) -> PeerCategory {
        let role = self.validators.peer_role(peer);
        PeerCategory::classify(role, resolver.by_id(peer) == self_shard)
    }

    /// Connected peers bucketed by category, input order preserved.
    pub fn split_peers(&self, connected: &[PeerId]) -> [Vec<PeerId>; 5] {
        let resolver = self.resolver.get();
        let self_shard = resolver.by_id(&self.self_id);

        let mut buckets: [Vec<PeerId>; 5] = Default::default();
        for peer in connected {
            let category = self.classify(resolver.as_ref(), self_shard, peer);
            buckets[category.index()].push(peer.clone());
        }
        buckets
    }

    /// Peers ordered by ascending Hamming distance to `reference`.
    pub fn sort_list(&self, peers: &[PeerId], reference: &PeerId) -> Vec<PeerId> {
        // Hamming distance ignores shards.
        let reference = SortingKey::for_peer(reference, 0);
        into_peers(sort_by_distance(peers, |peer| {
            hamming_distance(&reference, &SortingKey::for_peer(peer, 0))
        }))
    }

    /// Per-category kept/evicted split, in [`PeerCategory::ALL`] order.
    pub fn evict_by_category(&self, connected: &[PeerId]) -> Vec<CategoryEviction> {
        let buckets = self.split_peers(connected);
        let mut kept_total = 0usize;
        let mut outcome = Vec::with_capacity(PeerCategory::ALL.len());

        for (category, bucket) in PeerCategory::ALL.into_iter().zip(buckets) {
            let capacity = self
                .maxima
                .for_category(category)
                .unwrap_or_else(|| self.max_connection_count.saturating_sub(kept_total));

            let (kept, evicted) = evict(self.sort_list(&bucket, &self.self_id), capacity);
            kept_total += kept.len();
            outcome.push(CategoryEviction {
                category,
                capacity,
                kept,
                evicted,
            });
        }
        outcome
    }

    /// Union of all per-category evictions.
    pub fn compute_eviction_list(&self, connected: &[PeerId]) -> Vec<PeerId> {
        let evicted: Vec<PeerId> = self
            .evict_by_category(connected)
            .into_iter()
            .flat_map(|c| c.evicted)
            .collect();

        debug!(
            "[qc-18] lists: {} connected, {} to evict (max {})",
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

    /// Connected peers split by locality; unclassified peers are unknown.
    pub fn connected_peers_info(&self, connected: &[PeerId]) -> ConnectedPeersInfo {
        let [intra_v, cross_v, intra_o, cross_o, unknown] = self.split_peers(connected);
        ConnectedPeersInfo {
            unknown,
            intra_shard: intra_v.into_iter().chain(intra_o).collect(),
            cross_shard: cross_v.into_iter().chain(cross_o).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PeerRole;
    use crate::ports::{MockPeerShardResolver, StaticValidatorSet};
    use proptest::prelude::*;
    use std::collections::HashSet;

    const MAXIMA: CategoryMaxima = CategoryMaxima {
        intra_shard_validators: 2,
        cross_shard_validators: 2,
        intra_shard_observers: 1,
        cross_shard_observers: 1,
    };

    /// Peers named "<shard>-<role>-<n>"; self is "0-self".
    fn resolver() -> Option<Arc<dyn PeerShardResolver>> {
        Some(Arc::new(MockPeerShardResolver::from_fn(|peer| {
            u32::from(peer.as_bytes()[0] - b'0')
        })))
    }

    fn roles() -> Option<Arc<dyn ValidatorSet>> {
        struct ByName;
        impl ValidatorSet for ByName {
            fn peer_role(&self, peer: &PeerId) -> PeerRole {
                match peer.as_bytes().get(2) {
                    Some(b'v') => PeerRole::Validator,
                    Some(b'o') => PeerRole::Observer,
                    _ => PeerRole::Unknown,
                }
            }
        }
        Some(Arc::new(ByName))
    }

    fn peers(prefix: &str, count: usize) -> Vec<PeerId> {
        (0..count)
            .map(|i| PeerId::from(format!("{prefix}-{i}").as_str()))
            .collect()
    }

    fn sharder(max_connection_count: usize) -> ListsSharder {
        ListsSharder::new(
            PeerId::from("0-self"),
            max_connection_count,
            MAXIMA,
            resolver(),
            roles(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_requires_resolver() {
        let result = ListsSharder::new(PeerId::from("0-self"), 10, MAXIMA, None, roles());
        assert_eq!(result.unwrap_err(), ShardingError::NilPeerShardResolver);
    }

    #[test]
    fn test_new_requires_validator_set() {
        let result = ListsSharder::new(PeerId::from("0-self"), 10, MAXIMA, resolver(), None);
        assert_eq!(result.unwrap_err(), ShardingError::NilValidatorSet);
    }

    #[test]
    fn test_new_small_budget_fails() {
        let result = ListsSharder::new(PeerId::from("0-self"), 2, MAXIMA, resolver(), roles());
        assert!(matches!(result, Err(ShardingError::InvalidValue { .. })));
    }

    #[test]
    fn test_new_maxima_over_budget_fails() {
        let result = ListsSharder::new(PeerId::from("0-self"), 5, MAXIMA, resolver(), roles());
        assert_eq!(
            result.unwrap_err(),
            ShardingError::CategoryBudgetExceeded { total: 6, max: 5 }
        );
    }

    #[test]
    fn test_category_of() {
        let ls = sharder(10);
        assert_eq!(ls.category_of(&PeerId::from("0-v-1")), PeerCategory::IntraShardValidator);
        assert_eq!(ls.category_of(&PeerId::from("1-v-1")), PeerCategory::CrossShardValidator);
        assert_eq!(ls.category_of(&PeerId::from("0-o-1")), PeerCategory::IntraShardObserver);
        assert_eq!(ls.category_of(&PeerId::from("2-o-1")), PeerCategory::CrossShardObserver);
        assert_eq!(ls.category_of(&PeerId::from("0-u-1")), PeerCategory::Unknown);
        assert_eq!(ls.category_of(&PeerId::from("1-u-1")), PeerCategory::Unknown);
    }

    #[test]
    fn test_each_category_bounded_by_its_maximum() {
        let ls = sharder(10);
        let mut connected = peers("0-v", 5);
        connected.extend(peers("1-v", 5));
        connected.extend(peers("0-o", 5));
        connected.extend(peers("1-o", 5));

        let outcome = ls.evict_by_category(&connected);

        for entry in &outcome {
            if let Some(max) = MAXIMA.for_category(entry.category) {
                assert_eq!(entry.kept.len(), max, "{:?}", entry.category);
            }
        }
        assert_eq!(ls.compute_eviction_list(&connected).len(), 20 - 6);
    }

    #[test]
    fn test_unknown_gets_leftover_capacity() {
        let ls = sharder(10);
        let mut connected = peers("0-v", 1);
        connected.extend(peers("0-u", 20));

        let outcome = ls.evict_by_category(&connected);
        let unknown = &outcome[PeerCategory::Unknown.index()];

        assert_eq!(unknown.capacity, 9);
        assert_eq!(unknown.kept.len(), 9);
        assert_eq!(unknown.evicted.len(), 11);
    }

    #[test]
    fn test_unknown_squeezed_out_when_full() {
        let ls = ListsSharder::new(
            PeerId::from("0-self"),
            6,
            MAXIMA,
            resolver(),
            roles(),
        )
        .unwrap();
        let mut connected = peers("0-v", 3);
        connected.extend(peers("1-v", 3));
        connected.extend(peers("0-o", 3));
        connected.extend(peers("1-o", 3));
        connected.extend(peers("1-u", 3));

        let evicted: HashSet<PeerId> = ls.compute_eviction_list(&connected).into_iter().collect();
        assert!(peers("1-u", 3).iter().all(|p| evicted.contains(p)));
    }

    #[test]
    fn test_evicted_within_category_are_farthest() {
        let ls = sharder(10);
        let connected = peers("0-v", 6);
        let sorted = ls.sort_list(&connected, &PeerId::from("0-self"));

        let outcome = ls.evict_by_category(&connected);
        let intra = &outcome[PeerCategory::IntraShardValidator.index()];
        assert_eq!(intra.kept, sorted[..2].to_vec());
        assert_eq!(intra.evicted, sorted[2..].to_vec());
    }

    #[test]
    fn test_under_budget_evicts_nothing() {
        let ls = sharder(10);
        let mut connected = peers("0-v", 2);
        connected.extend(peers("2-o", 1));
        connected.extend(peers("0-u", 3));
        assert!(ls.compute_eviction_list(&connected).is_empty());
        assert!(ls.compute_eviction_list(&[]).is_empty());
    }

    #[test]
    fn test_connected_peers_info() {
        let ls = sharder(10);
        let connected = vec![
            PeerId::from("0-v-1"),
            PeerId::from("1-v-1"),
            PeerId::from("0-o-1"),
            PeerId::from("1-o-1"),
            PeerId::from("0-u-1"),
        ];

        let info = ls.connected_peers_info(&connected);
        assert_eq!(info.intra_shard, vec![PeerId::from("0-v-1"), PeerId::from("0-o-1")]);
        assert_eq!(info.cross_shard, vec![PeerId::from("1-v-1"), PeerId::from("1-o-1")]);
        assert_eq!(info.unknown, vec![PeerId::from("0-u-1")]);
    }

    #[test]
    fn test_set_resolver_reclassifies() {
        let ls = sharder(10);
        let peer = PeerId::from("1-v-1");
        assert_eq!(ls.category_of(&peer), PeerCategory::CrossShardValidator);

        ls.set_peer_shard_resolver(Some(Arc::new(MockPeerShardResolver::constant(0))))
            .unwrap();
        assert_eq!(ls.category_of(&peer), PeerCategory::IntraShardValidator);

        assert_eq!(
            ls.set_peer_shard_resolver(None),
            Err(ShardingError::NilPeerShardResolver)
        );
        assert_eq!(ls.category_of(&peer), PeerCategory::IntraShardValidator);
    }

    #[test]
    fn test_static_validator_set_integration() {
        let set = StaticValidatorSet::new(peers("0-x", 4), peers("1-x", 4));
        let ls = ListsSharder::new(
            PeerId::from("0-self"),
            10,
            MAXIMA,
            resolver(),
            Some(Arc::new(set)),
        )
        .unwrap();

        let mut connected = peers("0-x", 4);
        connected.extend(peers("1-x", 4));
        // 2 intra validators kept of 4, 1 cross observer kept of 4.
        assert_eq!(ls.compute_eviction_list(&connected).len(), 5);
    }

    proptest! {
        #[test]
        fn prop_categories_conserve_peers(
            shards in proptest::collection::vec(0u8..3, 0..60),
            roles_seed in proptest::collection::vec(0u8..3, 60),
        ) {
            let ls = sharder(10);
            let role_chars = [b'v', b'o', b'u'];
            let connected: Vec<PeerId> = shards
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let role = role_chars[roles_seed[i] as usize] as char;
                    PeerId::from(format!("{s}-{role}-{i}").as_str())
                })
                .collect();

            let outcome = ls.evict_by_category(&connected);
            let mut seen = 0usize;
            let mut kept_total = 0usize;
            for entry in &outcome {
                prop_assert!(entry.kept.len() <= entry.capacity);
                seen += entry.kept.len() + entry.evicted.len();
                kept_total += entry.kept.len();
            }
            prop_assert_eq!(seen, connected.len());
            prop_assert!(kept_total <= ls.max_connection_count());

            let evicted = ls.compute_eviction_list(&connected);
            prop_assert_eq!(evicted.len(), connected.len() - kept_total);
        }
    }
}
