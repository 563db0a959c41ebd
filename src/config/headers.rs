//! HTTP header value constants.
//!
//! Content types sent to the geolocation providers. Providers are picky about
//! these; a wrong content type is usually answered with an empty location.

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub const CONTENT_TYPE_XML: &str = "text/xml; charset=utf-8";
