//! wifi_locator library: WiFi access point geolocation and IPv4 range lookup
//!
//! This library provides high-level APIs for locating an access point by BSSID
//! or network name through many third-party geolocation services at once, and
//! for resolving the registry-allocated range owning an IPv4 address through
//! RIR classification, RDAP and WHOIS, backed by a SQLite cache.
//!
//! # Example
//!
//! ```no_run
//! use wifi_locator::{run_search, Config, SearchQuery};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let report = run_search(&config, SearchQuery::mac("00:11:22:33:44:55")?).await?;
//! for result in &report.results {
//!     println!("{}: {:?}", result.module, result.coordinates());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod app;
pub mod config;
pub mod error_handling;
pub mod initialization;
pub mod ipranges;
pub mod locate;
pub mod storage;

// Re-export public API
pub use app::{load_keys, load_validator, open_range_cache, open_range_manager, run_search, update_keys};
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{DatabaseError, LookupError, ProviderError, RegistryError};
pub use ipranges::{IpRange, IpRangeManager, Rir};
pub use locate::{
    Aggregator, ApiKeys, CoordinateValidator, LocationResult, LocationSource, Locator,
    SearchProgress, SearchQuery, SearchReport,
};
pub use storage::RangeCache;
