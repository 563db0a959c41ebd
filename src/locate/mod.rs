//! WiFi access point geolocation.
//!
//! This module provides:
//! - Query and result types
//! - Provider clients and the declarative provider plans
//! - The concurrent aggregator and its coordinate validator
//! - The API key store

pub mod aggregator;
mod locator;
pub mod plan;
pub mod preferences;
pub mod providers;
mod types;
pub mod validate;

// Re-export public API
pub use aggregator::{Aggregator, ProviderOutcome};
pub use locator::Locator;
pub use plan::{build_requests, build_sources, Requirement, MAC_PLAN, SSID_PLAN};
pub use preferences::ApiKeys;
pub use providers::{HttpSource, LocationSource, Provider, ProviderRequest};
pub use types::{normalize_bssid, LocationResult, SearchProgress, SearchQuery, SearchReport};
pub use validate::{CoordinateValidator, RejectRule};
