//! # Sharding Configuration
//!
//! Numeric configuration surface consumed by the factory.
//!
//! # Config File Format
//!
//! ```toml
//! type = "lists"
//! max_connection_count = 25
//! max_intra_shard_validators = 7
//! max_cross_shard_validators = 6
//! max_intra_shard_observers = 4
//! max_cross_shard_observers = 3
//! ```

use super::errors::ShardingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Closed set of sharder strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SharderVariant {
    /// Single list, XOR distance with same-shard bias.
    Kademlia,
    /// Single list, XOR distance without shard bias.
    SimplePriorityBits,
    /// Per-category lists with independent maxima.
    Lists,
    /// Single shard-blind list ranked by Hamming distance.
    OneList,
    /// Sharding disabled.
    #[default]
    NilList,
}

impl SharderVariant {
    /// Configuration name of this variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kademlia => "kademlia",
            Self::SimplePriorityBits => "simple-priority-bits",
            Self::Lists => "lists",
            Self::OneList => "one-list",
            Self::NilList => "nil-list",
        }
    }
}

impl fmt::Display for SharderVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SharderVariant {
    type Err = ShardingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kademlia" => Ok(Self::Kademlia),
            "simple-priority-bits" => Ok(Self::SimplePriorityBits),
            "lists" => Ok(Self::Lists),
            "one-list" => Ok(Self::OneList),
            "nil-list" => Ok(Self::NilList),
            other => Err(ShardingError::UnknownVariant(other.to_string())),
        }
    }
}

/// Sharding configuration.
///
/// `variant` is kept as text so an unrecognized name surfaces as
/// [`ShardingError::UnknownVariant`] at construction rather than as a parse
/// failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardingConfig {
    /// Strategy name.
    #[serde(rename = "type", default = "default_variant")]
    pub variant: String,
    /// Leading distance bits zeroed for same-shard peers.
    #[serde(default = "default_prio_bits")]
    pub prio_bits: u32,
    /// Total connection budget.
    #[serde(default = "default_max_connection_count")]
    pub max_connection_count: usize,
    /// Bound on validators in our shard.
    #[serde(default)]
    pub max_intra_shard_validators: Option<usize>,
    /// Bound on validators in other shards.
    #[serde(default)]
    pub max_cross_shard_validators: Option<usize>,
    /// Bound on observers in our shard.
    #[serde(default)]
    pub max_intra_shard_observers: Option<usize>,
    /// Bound on observers in other shards.
    #[serde(default)]
    pub max_cross_shard_observers: Option<usize>,
}

fn default_variant() -> String {
    SharderVariant::default().as_str().to_string()
}

fn default_prio_bits() -> u32 {
    1
}

fn default_max_connection_count() -> usize {
    25
}

impl Default for ShardingConfig {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            prio_bits: default_prio_bits(),
            max_connection_count: default_max_connection_count(),
            max_intra_shard_validators: None,
            max_cross_shard_validators: None,
            max_intra_shard_observers: None,
            max_cross_shard_observers: None,
        }
    }
}

impl ShardingConfig {
    /// Config for the given variant with defaults elsewhere.
    pub fn for_variant(variant: SharderVariant) -> Self {
        Self {
            variant: variant.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Set all four category maxima.
    #[must_use]
    pub fn with_category_maxima(
        mut self,
        intra_validators: usize,
        cross_validators: usize,
        intra_observers: usize,
        cross_observers: usize,
    ) -> Self {
        self.max_intra_shard_validators = Some(intra_validators);
        self.max_cross_shard_validators = Some(cross_validators);
        self.max_intra_shard_observers = Some(intra_observers);
        self.max_cross_shard_observers = Some(cross_observers);
        self
    }

    /// Parse the configured variant.
    pub fn variant(&self) -> Result<SharderVariant, ShardingError> {
        self.variant.parse()
    }

    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ShardingError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ShardingError::ConfigIo {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ShardingError> {
        toml::from_str(content).map_err(|e| ShardingError::ConfigParse(e.to_string()))
    }
}
