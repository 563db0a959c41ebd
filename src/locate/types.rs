//! Search inputs, per-provider results, and the final report.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error_handling::LookupError;

static BSSID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").expect("valid BSSID regex")
});

/// Validates a BSSID and returns it in lower-case colon form.
///
/// Accepts `:` or `-` separators (`00-11-22-AA-BB-CC` becomes
/// `00:11:22:aa:bb:cc`).
pub fn normalize_bssid(raw: &str) -> Result<String, LookupError> {
    let trimmed = raw.trim();
    if !BSSID_PATTERN.is_match(trimmed) {
        return Err(LookupError::InvalidBssid(raw.to_string()));
    }
    Ok(trimmed.replace('-', ":").to_ascii_lowercase())
}

/// What a search is looking for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum SearchQuery {
    /// Access point hardware address, lower-case colon form
    Mac(String),
    /// Network name
    Ssid(String),
}

impl SearchQuery {
    /// Validated BSSID query.
    pub fn mac(raw: &str) -> Result<Self, LookupError> {
        normalize_bssid(raw).map(SearchQuery::Mac)
    }

    /// Network-name query; the name must not be blank.
    pub fn ssid(raw: &str) -> Result<Self, LookupError> {
        if raw.trim().is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        Ok(SearchQuery::Ssid(raw.to_string()))
    }

    pub fn value(&self) -> &str {
        match self {
            SearchQuery::Mac(v) | SearchQuery::Ssid(v) => v,
        }
    }

    pub fn bssid(&self) -> Option<&str> {
        match self {
            SearchQuery::Mac(mac) => Some(mac),
            SearchQuery::Ssid(_) => None,
        }
    }

    pub fn ssid_name(&self) -> Option<&str> {
        match self {
            SearchQuery::Ssid(name) => Some(name),
            SearchQuery::Mac(_) => None,
        }
    }
}

impl std::fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchQuery::Mac(mac) => write!(f, "BSSID {}", mac),
            SearchQuery::Ssid(name) => write!(f, "SSID {:?}", name),
        }
    }
}

/// One provider's answer.
///
/// A found location carries coordinates; a failed call carries only `module`
/// and `error`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    /// Provider display name
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bssid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Provider-specific extra (building, community, node hostname)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LocationResult {
    pub fn found(module: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            module: module.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }

    pub fn failed(module: impl Into<String>, error: impl ToString) -> Self {
        Self {
            module: module.into(),
            error: Some(error.to_string()),
            ..Default::default()
        }
    }

    pub fn with_bssid(mut self, bssid: impl Into<String>) -> Self {
        self.bssid = Some(bssid.into());
        self
    }

    pub fn with_ssid(mut self, ssid: impl Into<String>) -> Self {
        self.ssid = Some(ssid.into());
        self
    }

    /// Sets the vendor field, ignoring blank values.
    pub fn with_vendor(mut self, vendor: Option<String>) -> Self {
        self.vendor = vendor.filter(|v| !v.trim().is_empty());
        self
    }

    /// `(latitude, longitude)` when both are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// Snapshot published to observers while a search runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchProgress {
    pub launched: usize,
    pub completed: usize,
    /// Every accepted result so far, in arrival order
    pub results: Vec<LocationResult>,
    pub finished: bool,
}

/// Final aggregate of one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchReport {
    pub query: SearchQuery,
    /// Accepted locations in arrival order
    pub results: Vec<LocationResult>,
    /// Providers that failed, with their error text
    pub failures: Vec<LocationResult>,
    pub providers_launched: usize,
    pub providers_completed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_bssid() {
        assert_eq!(normalize_bssid("00:11:22:AA:BB:CC").unwrap(), "00:11:22:aa:bb:cc");
        assert_eq!(normalize_bssid("00-11-22-aa-bb-cc").unwrap(), "00:11:22:aa:bb:cc");
        assert_eq!(normalize_bssid(" 00:11:22:aa:bb:cc\n").unwrap(), "00:11:22:aa:bb:cc");
    }

    #[test]
    fn test_invalid_bssids_are_rejected() {
        for raw in ["", "00:11:22:33:44", "00:11:22:33:44:55:66", "0011.2233.4455", "zz:11:22:33:44:55"] {
            assert_eq!(
                normalize_bssid(raw),
                Err(LookupError::InvalidBssid(raw.to_string())),
                "{:?}",
                raw
            );
        }
    }

    #[test]
    fn test_ssid_query_rejects_blank() {
        assert_eq!(SearchQuery::ssid("   "), Err(LookupError::EmptyQuery));
        assert_eq!(
            SearchQuery::ssid("Freifunk").unwrap(),
            SearchQuery::Ssid("Freifunk".into())
        );
    }

    #[test]
    fn test_failed_result_has_no_coordinates() {
        let r = LocationResult::failed("Google", "HTTP 403");
        assert_eq!(r.coordinates(), None);
        assert_eq!(r.error.as_deref(), Some("HTTP 403"));

        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("latitude").is_none());
    }

    #[test]
    fn test_blank_vendor_is_dropped() {
        let r = LocationResult::found("Combain", 1.0, 2.0).with_vendor(Some("  ".into()));
        assert_eq!(r.vendor, None);
        assert_eq!(r.coordinates(), Some((1.0, 2.0)));
    }

    #[test]
    fn test_bssid_pattern_compiles_and_anchors() {
        let re = LazyLock::force(&BSSID_PATTERN);
        assert!(re.is_match("00:11:22:aa:bb:cc"));
        assert!(re.is_match("00-11-22-AA-BB-CC"));
        assert!(!re.is_match("x00:11:22:aa:bb:cc"));
        assert!(!re.is_match("00:11:22:aa:bb:cc:dd"));
    }

    #[test]
    fn test_query_serializes_with_kind() {
        let json = serde_json::to_value(SearchQuery::Mac("00:11:22:33:44:55".into())).unwrap();
        assert_eq!(json["kind"], "mac");
        assert_eq!(json["value"], "00:11:22:33:44:55");
    }
}
