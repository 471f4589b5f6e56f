//! # Ports Layer - Hexagonal Architecture Boundaries
//!
//! - **Driving Ports (Inbound):** what the networking layer calls on a sharder
//! - **Driven Ports (Outbound):** shard resolution and validator membership
//!   supplied by the host

pub mod inbound;
pub mod outbound;

pub use inbound::PeerSharding;
pub use outbound::{MockPeerShardResolver, PeerShardResolver, StaticValidatorSet, ValidatorSet};
