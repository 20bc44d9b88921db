//! Configuration management
//!
//! Builds the immutable bridge configuration: which network profile to talk
//! to, its delegate endpoints, and how a broadcast is bounded. Sources are the
//! built-in profiles, an optional TOML file and `BRIDGE_*` environment
//! variables, in that order of precedence.

pub mod settings;

pub use settings::{BridgeConfig, NetworkProfile, DEFAULT_DELEGATE_PORT};
