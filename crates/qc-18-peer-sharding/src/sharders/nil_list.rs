//! Sharding disabled.

use super::all_unknown;
use crate::domain::{ConnectedPeersInfo, PeerId};

/// No-op sharder: never evicts, never reports membership.
#[derive(Debug, Clone, Copy, Default)]
pub struct NilListSharder;

impl NilListSharder {
    /// Always empty.
    pub fn compute_eviction_list(&self, _connected: &[PeerId]) -> Vec<PeerId> {
        Vec::new()
    }

    /// Input order, untouched.
    pub fn sort_list(&self, peers: &[PeerId], _reference: &PeerId) -> Vec<PeerId> {
        peers.to_vec()
    }

    /// Every peer is reported as unknown.
    pub fn connected_peers_info(&self, connected: &[PeerId]) -> ConnectedPeersInfo {
        all_unknown(connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sort_list_keeps_order() {
        let peers = vec![PeerId::from("b"), PeerId::from("a")];
        assert_eq!(NilListSharder.sort_list(&peers, &PeerId::from("x")), peers);
    }

    proptest! {
        #[test]
        fn prop_never_evicts(count in 0usize..2000) {
            let peers: Vec<PeerId> = (0..count)
                .map(|i| PeerId::new((i as u64).to_be_bytes().to_vec()))
                .collect();
            prop_assert!(NilListSharder.compute_eviction_list(&peers).is_empty());
        }
    }
}
