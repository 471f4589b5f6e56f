//! # Domain Invariants
//!
//! Construction-time rules every sharder must satisfy. Checked once by the
//! factory; a sharder that exists has already passed them.

use super::errors::{ShardId, ShardingError};

/// Reserved shard ID of the coordinating (metachain) shard.
pub const METACHAIN_SHARD_ID: ShardId = u32::MAX;

/// Largest effective number of priority bits (one full byte).
pub const MAX_PRIO_BITS: u8 = 8;

/// Smallest connection budget a sharder accepts.
pub const MIN_ALLOWED_CONNECTED_PEERS: usize = 3;

/// Invariant: priority bits are in `[1, 8]`.
///
/// Zero is rejected; values above 8 clamp to 8.
pub fn invariant_prio_bits(prio_bits: u32) -> Result<u8, ShardingError> {
    if prio_bits == 0 {
        return Err(ShardingError::BadParams);
    }
    Ok(prio_bits.min(MAX_PRIO_BITS as u32) as u8)
}

/// Invariant: the connection budget keeps the node meaningfully connected.
pub fn invariant_min_connections(max_connection_count: usize) -> Result<(), ShardingError> {
    if max_connection_count < MIN_ALLOWED_CONNECTED_PEERS {
        return Err(ShardingError::InvalidValue {
            field: "max_connection_count",
            value: max_connection_count,
            min: MIN_ALLOWED_CONNECTED_PEERS,
        });
    }
    Ok(())
}

/// Invariant: a required category maximum is present.
pub fn invariant_category_present(
    value: Option<usize>,
    field: &'static str,
) -> Result<usize, ShardingError> {
    value.ok_or(ShardingError::MissingCategoryMax(field))
}

/// Invariant: category maxima fit inside the connection budget.
///
/// A sum that overflows `usize` is reported with `total = usize::MAX`.
pub fn invariant_category_budget(
    category_maxima: &[usize],
    max_connection_count: usize,
) -> Result<(), ShardingError> {
    let exceeded = |total: usize| ShardingError::CategoryBudgetExceeded {
        total,
        max: max_connection_count,
    };

    let total = category_maxima
        .iter()
        .try_fold(0usize, |acc, &max| acc.checked_add(max))
        .ok_or_else(|| exceeded(usize::MAX))?;
    if total > max_connection_count {
        return Err(exceeded(total));
    }
    Ok(())
}
