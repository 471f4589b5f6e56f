//! # Domain Errors
//!
//! Error types for the Network Sharding subsystem.
//!
//! Only two classes exist: configuration errors raised while a sharder is
//! being built, and the runtime rejection of a nil resolver swap. Eviction,
//! sorting and membership queries are total and never fail.

use thiserror::Error;

/// Shard identifier.
pub type ShardId = u32;

/// Sharding error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShardingError {
    /// Priority bits must be at least 1.
    #[error("Bad parameters: prio bits must be at least 1")]
    BadParams,

    /// A peer shard resolver was required but none was provided.
    #[error("Nil peer shard resolver")]
    NilPeerShardResolver,

    /// A validator set was required but none was provided.
    #[error("Nil validator set")]
    NilValidatorSet,

    /// The configured sharder type is not recognized.
    #[error("Unknown sharder variant: {0:?}")]
    UnknownVariant(String),

    /// A numeric bound is below its allowed minimum.
    #[error("Invalid value for {field}: {value} (minimum {min})")]
    InvalidValue {
        /// Offending field
        field: &'static str,
        /// Provided value
        value: usize,
        /// Smallest accepted value
        min: usize,
    },

    /// Category maxima do not fit inside the connection budget.
    #[error("Category maxima sum to {total}, above max connection count {max}")]
    CategoryBudgetExceeded {
        /// Sum of the configured category maxima
        total: usize,
        /// Configured connection budget
        max: usize,
    },

    /// A category maximum required by the lists sharder is absent.
    #[error("Missing category maximum: {0}")]
    MissingCategoryMax(&'static str),

    /// Configuration file could not be parsed.
    #[error("Failed to parse sharding config: {0}")]
    ConfigParse(String),

    /// Configuration file could not be read.
    #[error("Failed to read {path}: {error}")]
    ConfigIo {
        /// Path of the file that failed to load
        path: String,
        /// Error message from the I/O operation
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variant_error() {
        let err = ShardingError::UnknownVariant("ring".to_string());
        assert!(err.to_string().contains("ring"));
    }

    #[test]
    fn test_invalid_value_error() {
        let err = ShardingError::InvalidValue {
            field: "max_connection_count",
            value: 2,
            min: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("max_connection_count"));
        assert!(msg.contains('2'));
        assert!(msg.contains('3'));
    }

    #[test]
    fn test_category_budget_error() {
        let err = ShardingError::CategoryBudgetExceeded { total: 12, max: 10 };
        assert!(err.to_string().contains("12"));
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_missing_category_error() {
        let err = ShardingError::MissingCategoryMax("max_cross_shard_observers");
        assert!(err.to_string().contains("max_cross_shard_observers"));
    }
}
