//! Crowd-sourced databases: Wigle, WifiDB, OpenWifiMap, Freifunk-Karte.
//!
//! These are the only providers that answer SSID queries. A match fills in
//! whichever of BSSID/SSID the query did not carry.

use log::debug;
use serde::Deserialize;

use super::lenient_f64;
use crate::error_handling::ProviderError;
use crate::locate::types::{LocationResult, SearchQuery};

#[derive(Debug, Deserialize)]
struct WigleResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    results: Vec<WigleNetwork>,
}

#[derive(Debug, Deserialize)]
struct WigleNetwork {
    #[serde(default, deserialize_with = "lenient_f64")]
    trilat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    trilong: Option<f64>,
    #[serde(default)]
    netid: Option<String>,
    #[serde(default)]
    ssid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoJson {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: WifiDbProperties,
}

#[derive(Debug, Deserialize)]
struct WifiDbProperties {
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lon: Option<f64>,
    #[serde(default)]
    mac: Option<String>,
    #[serde(default)]
    ssid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenWifiMapResponse {
    #[serde(default)]
    rows: Vec<OpenWifiMapRow>,
}

#[derive(Debug, Deserialize)]
struct OpenWifiMapRow {
    value: OpenWifiMapNode,
}

#[derive(Debug, Deserialize)]
struct OpenWifiMapNode {
    #[serde(default)]
    latlng: Vec<f64>,
    #[serde(default)]
    hostname: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FreifunkData {
    #[serde(rename = "allTheRouters", default)]
    all_the_routers: Vec<FreifunkRouter>,
}

#[derive(Debug, Deserialize)]
struct FreifunkRouter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, rename = "long", deserialize_with = "lenient_f64")]
    lon: Option<f64>,
    #[serde(default)]
    community: Option<String>,
}

/// Attaches the query to a result and fills the other identifier from the
/// provider's record.
fn identify(
    result: LocationResult,
    query: &SearchQuery,
    found_bssid: Option<String>,
    found_ssid: Option<String>,
) -> LocationResult {
    let mut result = match query {
        SearchQuery::Mac(mac) => result.with_bssid(mac.clone()),
        SearchQuery::Ssid(name) => result.with_ssid(name.clone()),
    };
    if result.bssid.is_none() {
        result.bssid = found_bssid.filter(|v| !v.is_empty());
    }
    if result.ssid.is_none() {
        result.ssid = found_ssid.filter(|v| !v.is_empty());
    }
    result
}

fn missing(what: &str) -> ProviderError {
    ProviderError::Malformed(format!("first match has no {}", what))
}

pub(super) fn parse_wigle(body: &[u8], query: &SearchQuery) -> Result<Option<LocationResult>, ProviderError> {
    let response: WigleResponse = serde_json::from_slice(body)?;
    if !response.success {
        debug!(
            "wigle: unsuccessful search ({})",
            response.message.as_deref().unwrap_or("no message")
        );
        return Ok(None);
    }
    let Some(first) = response.results.into_iter().next() else {
        return Ok(None);
    };
    let lat = first.trilat.ok_or_else(|| missing("trilat"))?;
    let lon = first.trilong.ok_or_else(|| missing("trilong"))?;
    Ok(Some(identify(
        LocationResult::found("wigle", lat, lon),
        query,
        first.netid,
        first.ssid,
    )))
}

pub(super) fn parse_wifidb(body: &[u8], query: &SearchQuery) -> Result<Option<LocationResult>, ProviderError> {
    let response: GeoJson = serde_json::from_slice(body)?;
    let Some(first) = response.features.into_iter().next() else {
        return Ok(None);
    };
    let props = first.properties;
    let lat = props.lat.ok_or_else(|| missing("lat"))?;
    let lon = props.lon.ok_or_else(|| missing("lon"))?;
    Ok(Some(identify(
        LocationResult::found("wifidb", lat, lon),
        query,
        props.mac,
        props.ssid,
    )))
}

pub(super) fn parse_openwifimap(body: &[u8], ssid: &str) -> Result<Option<LocationResult>, ProviderError> {
    let response: OpenWifiMapResponse = serde_json::from_slice(body)?;
    let Some(first) = response.rows.into_iter().next() else {
        return Ok(None);
    };
    let node = first.value;
    let &[lat, lon, ..] = node.latlng.as_slice() else {
        return Err(missing("latlng pair"));
    };
    Ok(Some(
        LocationResult::found("openwifimap", lat, lon)
            .with_ssid(ssid)
            .with_vendor(node.hostname),
    ))
}

pub(super) fn parse_freifunk(body: &[u8], ssid: &str) -> Result<Option<LocationResult>, ProviderError> {
    let data: FreifunkData = serde_json::from_slice(body)?;
    let wanted = ssid.to_lowercase();
    let Some(router) = data
        .all_the_routers
        .into_iter()
        .find(|r| r.name.as_deref().is_some_and(|n| n.to_lowercase() == wanted))
    else {
        return Ok(None);
    };
    let lat = router.lat.ok_or_else(|| missing("lat"))?;
    let lon = router.lon.ok_or_else(|| missing("long"))?;
    Ok(Some(
        LocationResult::found("freifunk-karte", lat, lon)
            .with_ssid(ssid)
            .with_vendor(router.community),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mac_query() -> SearchQuery {
        SearchQuery::Mac("00:11:22:aa:bb:cc".into())
    }

    fn ssid_query() -> SearchQuery {
        SearchQuery::Ssid("CoffeeShop".into())
    }

    #[test]
    fn test_wigle_by_mac_fills_ssid() {
        let body = br#"{"success":true,"totalResults":1,"results":[{"trilat":52.52,"trilong":13.40,"ssid":"CoffeeShop","netid":"00:11:22:AA:BB:CC"}]}"#;
        let r = parse_wigle(body, &mac_query()).unwrap().unwrap();
        assert_eq!(r.coordinates(), Some((52.52, 13.40)));
        assert_eq!(r.bssid.as_deref(), Some("00:11:22:aa:bb:cc"));
        assert_eq!(r.ssid.as_deref(), Some("CoffeeShop"));
    }

    #[test]
    fn test_wigle_by_ssid_fills_bssid() {
        let body = br#"{"success":true,"results":[{"trilat":"52.52","trilong":"13.40","ssid":"CoffeeShop","netid":"00:11:22:AA:BB:CC"}]}"#;
        let r = parse_wigle(body, &ssid_query()).unwrap().unwrap();
        assert_eq!(r.ssid.as_deref(), Some("CoffeeShop"));
        assert_eq!(r.bssid.as_deref(), Some("00:11:22:AA:BB:CC"));
    }

    #[test]
    fn test_wigle_unsuccessful_or_empty() {
        let body = br#"{"success":false,"message":"too many queries today"}"#;
        assert_eq!(parse_wigle(body, &mac_query()).unwrap(), None);
        let body = br#"{"success":true,"results":[]}"#;
        assert_eq!(parse_wigle(body, &mac_query()).unwrap(), None);
    }

    #[test]
    fn test_wifidb_first_feature() {
        let body = br#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"mac":"00:11:22:AA:BB:CC","ssid":"CoffeeShop","lat":"40.7128","lon":"-74.0060"},"geometry":{"type":"Point","coordinates":[-74.006,40.7128]}},
            {"type":"Feature","properties":{"mac":"x","ssid":"y","lat":"1","lon":"2"}}
        ]}"#;
        let r = parse_wifidb(body, &ssid_query()).unwrap().unwrap();
        assert_eq!(r.coordinates(), Some((40.7128, -74.006)));
        assert_eq!(r.bssid.as_deref(), Some("00:11:22:AA:BB:CC"));
        assert_eq!(r.module, "wifidb");
    }

    #[test]
    fn test_wifidb_no_features() {
        let body = br#"{"type":"FeatureCollection","features":[]}"#;
        assert_eq!(parse_wifidb(body, &mac_query()).unwrap(), None);
    }

    #[test]
    fn test_openwifimap() {
        let body = br#"{"total_rows":1,"offset":0,"rows":[{"id":"node1","key":"CoffeeShop","value":{"latlng":[52.5,13.4],"hostname":"node1.berlin.freifunk.net"}}]}"#;
        let r = parse_openwifimap(body, "CoffeeShop").unwrap().unwrap();
        assert_eq!(r.coordinates(), Some((52.5, 13.4)));
        assert_eq!(r.vendor.as_deref(), Some("node1.berlin.freifunk.net"));
        assert_eq!(r.ssid.as_deref(), Some("CoffeeShop"));

        assert_eq!(parse_openwifimap(br#"{"rows":[]}"#, "x").unwrap(), None);
        assert!(matches!(
            parse_openwifimap(br#"{"rows":[{"value":{"latlng":[1.0]}}]}"#, "x"),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn test_freifunk_matches_name_case_insensitively() {
        let body = br#"{"allTheRouters":[
            {"id":"1","lat":"50.0","long":"8.0","name":"other","community":"x"},
            {"id":"2","lat":"53.55","long":"9.99","name":"COFFEESHOP","community":"hamburg"}
        ]}"#;
        let r = parse_freifunk(body, "coffeeshop").unwrap().unwrap();
        assert_eq!(r.coordinates(), Some((53.55, 9.99)));
        assert_eq!(r.vendor.as_deref(), Some("hamburg"));
        assert_eq!(r.ssid.as_deref(), Some("coffeeshop"));

        assert_eq!(parse_freifunk(body, "missing").unwrap(), None);
    }
}
