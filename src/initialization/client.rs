//! HTTP client initialization.
//!
//! This module provides functions to initialize HTTP clients with the
//! timeouts each kind of upstream service needs.

use std::sync::Arc;
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::ClientBuilder;

use crate::config::{Config, RDAP_MAX_REDIRECTS};

/// Initializes an HTTP client for geolocation providers.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from config (providers that need another one set it per request)
/// - Connect timeout and overall timeout of `timeout_seconds`
/// - Rustls TLS backend (no native TLS)
///
/// Two of these are built per search: one with the general provider timeout
/// and one with the longer WifiDB timeout.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config, timeout_seconds: u64) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let timeout = Duration::from_secs(timeout_seconds);
    let client = ClientBuilder::new()
        .connect_timeout(timeout)
        .timeout(timeout)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the HTTP client used for RDAP lookups.
///
/// RDAP servers commonly redirect to the authoritative registry (ARIN's
/// bootstrap answers with a 301 towards RIPE, for example), so redirects are
/// followed up to `RDAP_MAX_REDIRECTS` hops.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_registry_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let timeout = Duration::from_secs(config.registry_timeout_seconds);
    let client = ClientBuilder::new()
        .redirect(Policy::limited(RDAP_MAX_REDIRECTS))
        .connect_timeout(timeout)
        .timeout(timeout)
        .user_agent(config.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
