//! Minimal XML lookups for the providers that answer in XML.

use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error_handling::ProviderError;

fn xml_error(e: impl std::fmt::Display) -> ProviderError {
    ProviderError::Xml(e.to_string())
}

/// Text content of the first element with local name `tag`.
pub(super) fn first_text(xml: &str, tag: &str) -> Result<Option<String>, ProviderError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut inside = false;
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) if e.local_name().as_ref() == tag.as_bytes() => inside = true,
            Event::Text(t) if inside => {
                return Ok(Some(t.unescape().map_err(xml_error)?.into_owned()));
            }
            Event::End(e) if inside && e.local_name().as_ref() == tag.as_bytes() => {
                return Ok(Some(String::new()));
            }
            Event::Empty(e) if e.local_name().as_ref() == tag.as_bytes() => {
                return Ok(Some(String::new()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Attributes (by local name) of the first element with local name `tag`.
pub(super) fn first_attributes(
    xml: &str,
    tag: &str,
) -> Result<Option<HashMap<String, String>>, ProviderError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == tag.as_bytes() => {
                let mut attrs = HashMap::new();
                for attr in e.attributes() {
                    let attr = attr.map_err(xml_error)?;
                    let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
                    let value = attr.unescape_value().map_err(xml_error)?.into_owned();
                    attrs.insert(key, value);
                }
                return Ok(Some(attrs));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Parses a decimal coordinate, naming the field on failure.
pub(super) fn coordinate(value: &str, field: &str) -> Result<f64, ProviderError> {
    value
        .trim()
        .parse()
        .map_err(|_| ProviderError::Malformed(format!("{} is not a number: {:?}", field, value)))
}
