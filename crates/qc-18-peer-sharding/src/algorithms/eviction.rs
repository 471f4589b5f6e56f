//! Capacity-bounded eviction over a distance-ranked list.

use crate::domain::PeerId;

/// Keep the `capacity` closest peers and evict the rest.
///
/// `sorted` must already be ranked closest first; no reordering happens here.
/// Exactly `len.saturating_sub(capacity)` peers are evicted.
pub fn evict(mut sorted: Vec<PeerId>, capacity: usize) -> (Vec<PeerId>, Vec<PeerId>) {
    if sorted.len() <= capacity {
        return (sorted, Vec::new());
    }
    let evicted = sorted.split_off(capacity);
    (sorted, evicted)
}
