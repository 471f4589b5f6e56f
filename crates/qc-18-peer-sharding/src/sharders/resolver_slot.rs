//! Swappable resolver reference shared by shard-aware sharders.

use crate::domain::ShardingError;
use crate::ports::PeerShardResolver;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{info, warn};

/// Resolver reference guarded by a read/write lock.
///
/// Readers take a clone of the `Arc` and release the lock before doing any
/// work, so a swap never waits on a long eviction pass and no reader sees a
/// half-written reference.
pub struct ResolverSlot {
    inner: RwLock<Arc<dyn PeerShardResolver>>,
}

impl ResolverSlot {
    /// Wrap an initial resolver.
    pub fn new(resolver: Arc<dyn PeerShardResolver>) -> Self {
        Self {
            inner: RwLock::new(resolver),
        }
    }

    /// Current resolver.
    pub fn get(&self) -> Arc<dyn PeerShardResolver> {
        Arc::clone(&self.inner.read())
    }

    /// Replace the resolver. `None` is rejected and the current one is kept.
    pub fn set(&self, resolver: Option<Arc<dyn PeerShardResolver>>) -> Result<(), ShardingError> {
        let Some(resolver) = resolver else {
            warn!("[qc-18] Rejected nil peer shard resolver, keeping current one");
            return Err(ShardingError::NilPeerShardResolver);
        };

        *self.inner.write() = resolver;
        info!("[qc-18] Peer shard resolver swapped");
        Ok(())
    }
}

impl std::fmt::Debug for ResolverSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverSlot").finish_non_exhaustive()
    }
}
