//! # Sharder Factory
//!
//! Single entry point turning a [`ShardingConfig`] plus collaborators into a
//! ready [`Sharder`]. Construction either fully succeeds or returns an error;
//! no partially built sharder escapes.

use crate::domain::{
    invariant_category_present, invariant_prio_bits, PeerId, SharderVariant, ShardingConfig,
    ShardingError,
};
use crate::ports::{PeerShardResolver, ValidatorSet};
use crate::sharders::{
    CategoryMaxima, KadSharder, ListsSharder, NilListSharder, OneListSharder, PrioBitsSharder,
    Sharder,
};
use std::sync::Arc;
use tracing::info;

/// Everything the factory needs to build a sharder.
///
/// # Example
///
/// ```rust,ignore
/// let sharder = new_sharder(SharderArgs {
///     config: ShardingConfig::for_variant(SharderVariant::Kademlia),
///     self_peer_id: PeerId::from("self"),
///     resolver: Some(Arc::new(mapper.clone())),
///     validators: None,
/// })?;
/// ```
#[derive(Clone)]
pub struct SharderArgs {
    /// Numeric configuration.
    pub config: ShardingConfig,
    /// Identity of the local node.
    pub self_peer_id: PeerId,
    /// Peer-to-shard lookup; required by kademlia and lists.
    pub resolver: Option<Arc<dyn PeerShardResolver>>,
    /// Validator membership; required by lists.
    pub validators: Option<Arc<dyn ValidatorSet>>,
}

impl SharderArgs {
    /// Args without collaborators.
    pub fn new(config: ShardingConfig, self_peer_id: PeerId) -> Self {
        Self {
            config,
            self_peer_id,
            resolver: None,
            validators: None,
        }
    }

    /// Attach a peer shard resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn PeerShardResolver>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Attach a validator set.
    #[must_use]
    pub fn with_validators(mut self, validators: Arc<dyn ValidatorSet>) -> Self {
        self.validators = Some(validators);
        self
    }
}

impl std::fmt::Debug for SharderArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharderArgs")
            .field("config", &self.config)
            .field("self_peer_id", &self.self_peer_id)
            .field("resolver", &self.resolver.is_some())
            .field("validators", &self.validators.is_some())
            .finish()
    }
}

/// Build the sharder named by `args.config`.
///
/// # Errors
///
/// - [`ShardingError::UnknownVariant`] for an unrecognized `type`
/// - [`ShardingError::BadParams`] if `prio_bits` is zero for any variant but
///   nil-list
/// - any construction error of the selected variant
pub fn new_sharder(args: SharderArgs) -> Result<Sharder, ShardingError> {
    let SharderArgs {
        config,
        self_peer_id,
        resolver,
        validators,
    } = args;
    let variant = config.variant()?;
    if variant != SharderVariant::NilList {
        invariant_prio_bits(config.prio_bits)?;
    }

    let sharder = match variant {
        SharderVariant::Kademlia => Sharder::Kademlia(KadSharder::new(
            self_peer_id,
            config.prio_bits,
            config.max_connection_count,
            resolver,
        )?),
        SharderVariant::SimplePriorityBits => Sharder::SimplePriorityBits(PrioBitsSharder::new(
            self_peer_id,
            config.max_connection_count,
        )?),
        SharderVariant::Lists => Sharder::Lists(ListsSharder::new(
            self_peer_id,
            config.max_connection_count,
            category_maxima(&config)?,
            resolver,
            validators,
        )?),
        SharderVariant::OneList => Sharder::OneList(OneListSharder::new(
            self_peer_id,
            config.max_connection_count,
        )?),
        SharderVariant::NilList => Sharder::NilList(NilListSharder),
    };

    info!(
        "[qc-18] Built {} sharder (max connections {})",
        variant, config.max_connection_count
    );
    Ok(sharder)
}

fn category_maxima(config: &ShardingConfig) -> Result<CategoryMaxima, ShardingError> {
    Ok(CategoryMaxima {
        intra_shard_validators: invariant_category_present(
            config.max_intra_shard_validators,
            "max_intra_shard_validators",
        )?,
        cross_shard_validators: invariant_category_present(
            config.max_cross_shard_validators,
            "max_cross_shard_validators",
        )?,
        intra_shard_observers: invariant_category_present(
            config.max_intra_shard_observers,
            "max_intra_shard_observers",
        )?,
        cross_shard_observers: invariant_category_present(
            config.max_cross_shard_observers,
            "max_cross_shard_observers",
        )?,
    })
}
