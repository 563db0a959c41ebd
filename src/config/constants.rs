//! Configuration constants.
//!
//! This module defines the timeouts, endpoints, and thresholds used throughout
//! the application.

pub const DB_PATH: &str = "./wifi_locator.db";

/// File name of the API key store inside the user's config directory
pub const KEYS_FILE_NAME: &str = "keys.json";
/// Directory (under `$XDG_CONFIG_HOME` or `~/.config`) holding the key store
pub const CONFIG_DIR_NAME: &str = "wifi_locator";

// Network operation timeouts
/// Connect/read timeout for every geolocation provider except WifiDB
pub const PROVIDER_TIMEOUT_SECS: u64 = 10;
/// WifiDB answers slowly; it gets a longer budget than other providers
pub const WIFIDB_TIMEOUT_SECS: u64 = 30;
/// RDAP HTTP and WHOIS socket timeout (applies to connect and to read)
pub const REGISTRY_TIMEOUT_SECS: u64 = 10;
/// Maximum redirects followed for RDAP lookups
pub const RDAP_MAX_REDIRECTS: usize = 10;

/// Default User-Agent for provider requests that do not mandate their own.
pub const DEFAULT_USER_AGENT: &str = concat!("wifi_locator/", env!("CARGO_PKG_VERSION"));

/// User-Agent expected by Apple's WLoc endpoint.
pub const APPLE_USER_AGENT: &str = "locationd/1753.17 CFNetwork/889.9 Darwin/17.2.0";

// WHOIS
pub const WHOIS_PORT: u16 = 43;
/// Upper bound on a WHOIS response body (1MB); registries answer with a few KB
pub const MAX_WHOIS_RESPONSE_SIZE: usize = 1024 * 1024;

// Range cache
/// Ranges spanning this many addresses or more are never cached (a /8 or wider
/// allocation says little about the queried address)
pub const MAX_CACHEABLE_SPAN: u64 = 1 << 24;

/// Accept header sent with RDAP queries
pub const RDAP_ACCEPT: &str = "application/json, application/rdap+json";

/// Apple reports this latitude (fixed-point, 1e-8 degrees) when it has no fix
pub const APPLE_NO_LOCATION_SENTINEL: i64 = 18_000_000_000;
/// Scale of Apple's fixed-point coordinates
pub const APPLE_COORDINATE_SCALE: f64 = 1e-8;

/// Environment variables that override the stored API keys
pub const ENV_WIGLE_API_KEY: &str = "WIGLE_API_KEY";
pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const ENV_COMBAIN_API_KEY: &str = "COMBAIN_API_KEY";
pub const ENV_YANDEX_API_KEY: &str = "YANDEX_API_KEY";
