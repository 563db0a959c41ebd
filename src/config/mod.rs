//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, endpoints, thresholds)
//! - HTTP header value constants
//! - CLI option types and parsing

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{
    default_keys_path, CacheCommand, Cli, Command, Config, KeysCommand, LogFormat, LogLevel,
    SetKeys,
};
