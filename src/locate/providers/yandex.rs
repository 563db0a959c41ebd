//! Yandex: the keyed Locator API and the legacy mobile maps endpoint.
//! Both answer in XML.

use quick_xml::escape::escape;
use url::form_urlencoded;

use super::xml::{coordinate, first_attributes, first_text};
use crate::error_handling::ProviderError;
use crate::locate::types::LocationResult;

/// BSSID as Yandex wants it: upper-case hex, no separators.
pub(super) fn bare_mac(bssid: &str) -> String {
    bssid.replace([':', '-'], "").to_ascii_uppercase()
}

/// Form-encoded `xml=<ya_lbs_request>...` body for the Locator API.
pub(super) fn locator_body(bssid: &str, api_key: &str) -> Vec<u8> {
    let xml = format!(
        "<ya_lbs_request><common><version>1.0</version><api_key>{}</api_key></common>\
         <wifi_networks><network><mac>{}</mac></network></wifi_networks></ya_lbs_request>",
        escape(api_key),
        bare_mac(bssid)
    );
    form_urlencoded::Serializer::new(String::new())
        .append_pair("xml", &xml)
        .finish()
        .into_bytes()
}

/// `<position><latitude>..</latitude><longitude>..</longitude>`; an
/// `<error>` answer has neither and is "not found".
pub(super) fn parse_locator(xml: &str, bssid: &str) -> Result<Option<LocationResult>, ProviderError> {
    let (Some(lat), Some(lon)) = (first_text(xml, "latitude")?, first_text(xml, "longitude")?) else {
        return Ok(None);
    };
    Ok(Some(
        LocationResult::found(
            "yandex-locator",
            coordinate(&lat, "latitude")?,
            coordinate(&lon, "longitude")?,
        )
        .with_bssid(bssid),
    ))
}

/// `<coordinates latitude=".." longitude=".."/>`
pub(super) fn parse_legacy(xml: &str, bssid: &str) -> Result<Option<LocationResult>, ProviderError> {
    let Some(attrs) = first_attributes(xml, "coordinates")? else {
        return Ok(None);
    };
    let (Some(lat), Some(lon)) = (attrs.get("latitude"), attrs.get("longitude")) else {
        return Ok(None);
    };
    Ok(Some(
        LocationResult::found(
            "yandex",
            coordinate(lat, "latitude")?,
            coordinate(lon, "longitude")?,
        )
        .with_bssid(bssid),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAC: &str = "00:11:22:aa:bb:cc";

    #[test]
    fn test_bare_mac() {
        assert_eq!(bare_mac("00:11:22:aa:bb:cc"), "001122AABBCC");
        assert_eq!(bare_mac("00-11-22-aa-bb-cc"), "001122AABBCC");
    }

    #[test]
    fn test_locator_body_is_form_encoded_xml() {
        let body = String::from_utf8(locator_body(MAC, "KEY&1")).unwrap();
        assert!(body.starts_with("xml=%3Cya_lbs_request%3E"));

        let decoded: Vec<(String, String)> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(decoded.len(), 1);
        let xml = &decoded[0].1;
        assert!(xml.contains("<api_key>KEY&amp;1</api_key>"));
        assert!(xml.contains("<mac>001122AABBCC</mac>"));
        assert!(xml.contains("<version>1.0</version>"));
    }

    #[test]
    fn test_locator_position() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<ya_lbs_response>
  <position>
    <latitude>55.7340950</latitude>
    <longitude>37.5882320</longitude>
    <altitude>0.0</altitude>
    <precision>100.0</precision>
    <type>wifi</type>
  </position>
</ya_lbs_response>"#;
        let r = parse_locator(xml, MAC).unwrap().unwrap();
        assert_eq!(r.coordinates(), Some((55.734095, 37.588232)));
        assert_eq!(r.module, "yandex-locator");
    }

    #[test]
    fn test_locator_error_is_not_found() {
        let xml = "<ya_lbs_response><error><code>no_location</code></error></ya_lbs_response>";
        assert_eq!(parse_locator(xml, MAC).unwrap(), None);
    }

    #[test]
    fn test_legacy_coordinates() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<location source="FoundByWifi">
  <coordinates latitude="55.7522200" longitude="37.6155600" nlatitude="55.7531" nlongitude="37.6172"/>
</location>"#;
        let r = parse_legacy(xml, MAC).unwrap().unwrap();
        assert_eq!(r.coordinates(), Some((55.75222, 37.61556)));
        assert_eq!(r.module, "yandex");
    }

    #[test]
    fn test_legacy_not_found() {
        assert_eq!(parse_legacy("<error>Not found</error>", MAC).unwrap(), None);
        assert!(matches!(
            parse_legacy(r#"<coordinates latitude="x" longitude="1"/>"#, MAC),
            Err(ProviderError::Malformed(_))
        ));
    }
}
