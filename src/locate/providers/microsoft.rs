//! Microsoft location inference service (POX fingerprint endpoint).

use chrono::{DateTime, Utc};
use quick_xml::escape::escape;

use super::xml::{coordinate, first_attributes};
use crate::error_handling::ProviderError;
use crate::locate::types::LocationResult;

pub(super) fn request_body(bssid: &str, now: DateTime<Utc>) -> Vec<u8> {
    format!(
        r#"<GetLocationUsingFingerprint xmlns="http://inference.location.live.com">
  <RequestHeader>
    <Timestamp>{timestamp}</Timestamp>
    <ApplicationId>e1e71f6b-2149-45f3-a298-a20682ab5017</ApplicationId>
    <TrackingId>21BF9AD6-CFD3-46B3-B86A-2D81F5D9F9E8</TrackingId>
    <DeviceProfile ClientGuid="0fc571be-4624-4ce0-b04e-911bdeb1a222" Platform="Windows7" DeviceType="PC" OSVersion="7600.16695.amd64fre.win7_gdr.101026-1503" LFVersion="9.0.8080.16413" ExtendedDeviceInfo="" />
    <Authorization />
  </RequestHeader>
  <BeaconFingerprint>
    <Detections>
      <Wifi7 BssId="{bssid}" rssi="-1" />
    </Detections>
  </BeaconFingerprint>
</GetLocationUsingFingerprint>"#,
        timestamp = now.to_rfc3339(),
        bssid = escape(bssid),
    )
    .into_bytes()
}

/// Accepts only `ResolverStatus Status="Success"`; anything else is "not found".
pub(super) fn parse_response(xml: &str, bssid: &str) -> Result<Option<LocationResult>, ProviderError> {
    let success = first_attributes(xml, "ResolverStatus")?
        .and_then(|attrs| attrs.get("Status").cloned())
        .is_some_and(|status| status == "Success");
    if !success {
        return Ok(None);
    }

    let attrs = first_attributes(xml, "ResolvedPosition")?
        .ok_or_else(|| ProviderError::Malformed("Success without ResolvedPosition".into()))?;
    let (Some(lat), Some(lon)) = (attrs.get("Latitude"), attrs.get("Longitude")) else {
        return Err(ProviderError::Malformed("ResolvedPosition without coordinates".into()));
    };
    Ok(Some(
        LocationResult::found(
            "microsoft",
            coordinate(lat, "Latitude")?,
            coordinate(lon, "Longitude")?,
        )
        .with_bssid(bssid),
    ))
}
