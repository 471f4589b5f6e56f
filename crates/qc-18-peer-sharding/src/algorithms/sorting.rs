//! Peer sorting and selection.

use crate::domain::{PeerDistance, PeerId};
use primitive_types::U256;

/// Rank peers by ascending distance (closest first).
///
/// The sort is stable, so equal distances keep their input order and
/// repeated calls over the same input give the same output.
pub fn sort_by_distance<F>(peers: &[PeerId], distance: F) -> Vec<PeerDistance>
where
    F: Fn(&PeerId) -> U256,
{
    let mut ranked: Vec<PeerDistance> = peers
        .iter()
        .map(|peer| PeerDistance::new(peer.clone(), distance(peer)))
        .collect();
    ranked.sort_by(|a, b| a.distance.cmp(&b.distance));
    ranked
}

/// Strip distances from a ranked list.
pub fn into_peers(ranked: Vec<PeerDistance>) -> Vec<PeerId> {
    ranked.into_iter().map(|pd| pd.peer).collect()
}

/// Find the k closest peers according to `distance`.
pub fn find_k_closest<F>(peers: &[PeerId], k: usize, distance: F) -> Vec<PeerId>
where
    F: Fn(&PeerId) -> U256,
{
    sort_by_distance(peers, distance)
        .into_iter()
        .take(k)
        .map(|pd| pd.peer)
        .collect()
}
