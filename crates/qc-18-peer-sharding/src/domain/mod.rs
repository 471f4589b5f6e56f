//! # Domain Module
//!
//! Core domain types for the Network Sharding subsystem.

pub mod config;
pub mod errors;
pub mod invariants;
pub mod value_objects;

pub use config::*;
pub use errors::*;
pub use invariants::*;
pub use value_objects::*;
