//! Configuration models and environment loading for nz-mem0.
//!
//! This crate owns the mem0 config schema, defaults, and the `MEM0_*`
//! environment variable surface used by deployments.

mod env;
mod error;
mod model;

/// Public error type returned by config loading and validation APIs.
pub use error::ConfigError;
/// Configuration schema models.
pub use model::*;
