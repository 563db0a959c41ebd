//! Apple WLoc: a protobuf message inside a fixed binary preamble.

use log::debug;
use prost::Message;

use crate::config::{APPLE_COORDINATE_SCALE, APPLE_NO_LOCATION_SENTINEL};
use crate::error_handling::ProviderError;
use crate::locate::types::LocationResult;

/// Bytes before the protobuf in every response.
const RESPONSE_HEADER_LEN: usize = 10;

#[derive(Clone, PartialEq, Message)]
pub struct AppleWLoc {
    #[prost(int64, optional, tag = "1")]
    pub unknown_value0: Option<i64>,
    #[prost(message, repeated, tag = "2")]
    pub wifi_devices: Vec<WifiDevice>,
    #[prost(int32, optional, tag = "3")]
    pub unknown_value1: Option<i32>,
    #[prost(int32, optional, tag = "4")]
    pub return_single_result: Option<i32>,
    #[prost(string, optional, tag = "5")]
    pub api_name: Option<String>,
}

#[derive(Clone, PartialEq, Message)]
pub struct WifiDevice {
    #[prost(string, tag = "1")]
    pub bssid: String,
    #[prost(message, optional, tag = "2")]
    pub location: Option<Location>,
}

/// Fixed-point position (1e-8 degrees). Fields 3-12 and 21 carry accuracy
/// and altitude data that is not used.
#[derive(Clone, PartialEq, Message)]
pub struct Location {
    #[prost(int64, optional, tag = "1")]
    pub latitude: Option<i64>,
    #[prost(int64, optional, tag = "2")]
    pub longitude: Option<i64>,
    #[prost(int64, optional, tag = "3")]
    pub unknown_value3: Option<i64>,
    #[prost(int64, optional, tag = "4")]
    pub unknown_value4: Option<i64>,
    #[prost(int64, optional, tag = "5")]
    pub unknown_value5: Option<i64>,
    #[prost(int64, optional, tag = "6")]
    pub unknown_value6: Option<i64>,
    #[prost(int64, optional, tag = "7")]
    pub unknown_value7: Option<i64>,
    #[prost(int64, optional, tag = "8")]
    pub unknown_value8: Option<i64>,
    #[prost(int64, optional, tag = "9")]
    pub unknown_value9: Option<i64>,
    #[prost(int64, optional, tag = "10")]
    pub unknown_value10: Option<i64>,
    #[prost(int64, optional, tag = "11")]
    pub unknown_value11: Option<i64>,
    #[prost(int64, optional, tag = "12")]
    pub unknown_value12: Option<i64>,
    #[prost(int64, optional, tag = "21")]
    pub unknown_value21: Option<i64>,
}

fn preamble() -> Vec<u8> {
    let mut out = Vec::with_capacity(64);
    out.extend_from_slice(&[0x00, 0x01, 0x00, 0x05]);
    out.extend_from_slice(b"en_US");
    out.extend_from_slice(&[0x00, 0x13]);
    out.extend_from_slice(b"com.apple.locationd");
    out.extend_from_slice(&[0x00, 0x0a]);
    out.extend_from_slice(b"8.1.12B411");
    out.extend_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00]);
    out
}

/// Builds the request body for one BSSID: preamble, one length byte,
/// protobuf.
pub fn encode_request(bssid: &str) -> Result<Vec<u8>, ProviderError> {
    let message = AppleWLoc {
        unknown_value0: Some(0),
        wifi_devices: vec![WifiDevice {
            bssid: bssid.to_string(),
            location: None,
        }],
        unknown_value1: Some(0),
        return_single_result: Some(1),
        api_name: None,
    };
    let payload = message.encode_to_vec();
    let len = u8::try_from(payload.len()).map_err(|_| {
        ProviderError::Malformed(format!("request payload of {} bytes", payload.len()))
    })?;

    let mut out = preamble();
    out.push(len);
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Returns the first device with a real fix.
pub fn decode_response(body: &[u8], bssid: &str) -> Result<Option<LocationResult>, ProviderError> {
    let payload = body.get(RESPONSE_HEADER_LEN..).ok_or_else(|| {
        ProviderError::Malformed(format!("response of {} bytes has no payload", body.len()))
    })?;
    let response = AppleWLoc::decode(payload)?;
    debug!("apple returned {} devices", response.wifi_devices.len());

    let found = response.wifi_devices.iter().find_map(|device| {
        let location = device.location.as_ref()?;
        let (lat, lon) = (location.latitude?, location.longitude?);
        if lat == APPLE_NO_LOCATION_SENTINEL {
            return None;
        }
        Some((
            lat as f64 * APPLE_COORDINATE_SCALE,
            lon as f64 * APPLE_COORDINATE_SCALE,
        ))
    });

    Ok(found.map(|(lat, lon)| LocationResult::found("apple", lat, lon).with_bssid(bssid)))
}
