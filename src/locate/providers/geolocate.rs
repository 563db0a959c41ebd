//! JSON geolocation APIs keyed by BSSID: Mylnikov, AlterGeo, Google, Combain.

use log::debug;
use serde::Deserialize;
use serde_json::json;

use super::lenient_f64;
use crate::error_handling::ProviderError;
use crate::locate::types::LocationResult;

/// Second access point sent to Google; the API refuses single-AP requests.
const GOOGLE_PADDING_AP: &str = "00:25:9c:cf:1c:ad";
/// Second access point sent to Combain, for the same reason.
const COMBAIN_PADDING_AP: &str = "28:28:5d:d6:39:8a";

#[derive(Debug, Deserialize)]
struct MylnikovResponse {
    result: i64,
    #[serde(default)]
    data: Option<LatLon>,
    #[serde(default)]
    desc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LatLon {
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AlterGeoResponse {
    #[serde(default)]
    location: Option<AlterGeoLocation>,
}

#[derive(Debug, Deserialize)]
struct AlterGeoLocation {
    #[serde(default, deserialize_with = "lenient_f64")]
    latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    longitude: Option<f64>,
}

/// W3C-style `geolocate` answer shared by Google and Combain.
#[derive(Debug, Deserialize)]
struct GeolocateResponse {
    #[serde(default)]
    location: Option<LatLng>,
    #[serde(default)]
    indoor: Option<Indoor>,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    #[serde(default, deserialize_with = "lenient_f64")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    lng: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indoor {
    #[serde(default)]
    building: Option<String>,
}

pub(super) fn altergeo_body(bssid: &str) -> Vec<u8> {
    json!({
        "version": "1.1.0",
        "request_address": false,
        "wifi_towers": [
            { "mac_address": bssid, "signal_strength": -50 }
        ]
    })
    .to_string()
    .into_bytes()
}

pub(super) fn google_body(bssid: &str) -> Vec<u8> {
    json!({
        "considerIp": "false",
        "wifiAccessPoints": [
            { "macAddress": bssid },
            { "macAddress": GOOGLE_PADDING_AP }
        ]
    })
    .to_string()
    .into_bytes()
}

pub(super) fn combain_body(bssid: &str) -> Vec<u8> {
    json!({
        "wifiAccessPoints": [
            { "macAddress": bssid },
            { "macAddress": COMBAIN_PADDING_AP }
        ],
        "indoor": 1
    })
    .to_string()
    .into_bytes()
}

pub(super) fn parse_mylnikov(
    module: &str,
    body: &[u8],
    bssid: &str,
) -> Result<Option<LocationResult>, ProviderError> {
    let response: MylnikovResponse = serde_json::from_slice(body)?;
    if response.result != 200 {
        debug!(
            "{}: result {} ({})",
            module,
            response.result,
            response.desc.as_deref().unwrap_or("no description")
        );
        return Ok(None);
    }
    let data = response
        .data
        .ok_or_else(|| ProviderError::Malformed("result 200 without data".into()))?;
    match (data.lat, data.lon) {
        (Some(lat), Some(lon)) => Ok(Some(LocationResult::found(module, lat, lon).with_bssid(bssid))),
        _ => Err(ProviderError::Malformed("data without lat/lon".into())),
    }
}

pub(super) fn parse_altergeo(body: &[u8], bssid: &str) -> Result<Option<LocationResult>, ProviderError> {
    let response: AlterGeoResponse = serde_json::from_slice(body)?;
    Ok(response.location.and_then(|loc| {
        Some(LocationResult::found("altergeo", loc.latitude?, loc.longitude?).with_bssid(bssid))
    }))
}

fn parse_geolocate(
    module: &str,
    body: &[u8],
    bssid: &str,
) -> Result<Option<(LocationResult, Option<Indoor>)>, ProviderError> {
    let response: GeolocateResponse = serde_json::from_slice(body)?;
    let Some(location) = response.location else {
        return Ok(None);
    };
    match (location.lat, location.lng) {
        (Some(lat), Some(lng)) => Ok(Some((
            LocationResult::found(module, lat, lng).with_bssid(bssid),
            response.indoor,
        ))),
        _ => Err(ProviderError::Malformed("location without lat/lng".into())),
    }
}

pub(super) fn parse_google(body: &[u8], bssid: &str) -> Result<Option<LocationResult>, ProviderError> {
    Ok(parse_geolocate("google", body, bssid)?.map(|(result, _)| result))
}

pub(super) fn parse_combain(body: &[u8], bssid: &str) -> Result<Option<LocationResult>, ProviderError> {
    Ok(parse_geolocate("combain", body, bssid)?
        .map(|(result, indoor)| result.with_vendor(indoor.and_then(|i| i.building))))
}
