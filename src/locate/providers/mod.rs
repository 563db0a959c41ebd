//! Geolocation provider clients.
//!
//! Every provider is one request/response pair. [`ProviderRequest`] holds
//! what a single call needs (query plus key), serializes itself into an
//! [`HttpRequestSpec`], and parses the provider's response body. Network
//! execution is shared by all providers in [`HttpSource`].

mod apple;
mod community;
mod geolocate;
mod microsoft;
mod xml;
mod yandex;

use std::sync::Arc;

use futures::future::BoxFuture;
use log::debug;
use reqwest::header::{HeaderName, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::{Deserialize, Deserializer};
use strum_macros::EnumIter as EnumIterMacro;
use url::Url;

use super::types::{LocationResult, SearchQuery};
use crate::config::{APPLE_USER_AGENT, CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, CONTENT_TYPE_XML};
use crate::error_handling::ProviderError;

pub use apple::{decode_response as decode_apple_response, encode_request as encode_apple_request};

/// Known geolocation services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum Provider {
    Apple,
    /// Mylnikov open dataset
    Mylnikov,
    /// Mylnikov full dataset
    MylnikovFull,
    AlterGeo,
    YandexLocator,
    /// Keyless mobile maps endpoint
    YandexLegacy,
    Microsoft,
    Google,
    Combain,
    Wigle,
    WifiDb,
    OpenWifiMap,
    FreifunkKarte,
}

impl Provider {
    /// Module name reported in results and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Apple => "apple",
            Provider::Mylnikov => "mylnikov",
            Provider::MylnikovFull => "mylnikov-full",
            Provider::AlterGeo => "altergeo",
            Provider::YandexLocator => "yandex-locator",
            Provider::YandexLegacy => "yandex",
            Provider::Microsoft => "microsoft",
            Provider::Google => "google",
            Provider::Combain => "combain",
            Provider::Wigle => "wigle",
            Provider::WifiDb => "wifidb",
            Provider::OpenWifiMap => "openwifimap",
            Provider::FreifunkKarte => "freifunk-karte",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything one provider call needs, one variant per provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRequest {
    Apple { bssid: String },
    Mylnikov { bssid: String, open_data: bool },
    AlterGeo { bssid: String },
    YandexLocator { bssid: String, api_key: String },
    YandexLegacy { bssid: String },
    Microsoft { bssid: String },
    Google { bssid: String, api_key: String },
    Combain { bssid: String, api_key: String },
    Wigle { query: SearchQuery, api_key: String },
    WifiDb { query: SearchQuery },
    OpenWifiMap { ssid: String },
    FreifunkKarte { ssid: String },
}

/// A fully serialized HTTP call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequestSpec {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(HeaderName, String)>,
    /// `(content type, body)`
    pub body: Option<(&'static str, Vec<u8>)>,
}

impl HttpRequestSpec {
    fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    fn post(url: impl Into<String>, content_type: &'static str, body: Vec<u8>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: Vec::new(),
            body: Some((content_type, body)),
        }
    }

    fn header(mut self, name: HeaderName, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

impl ProviderRequest {
    pub fn provider(&self) -> Provider {
        match self {
            ProviderRequest::Apple { .. } => Provider::Apple,
            ProviderRequest::Mylnikov { open_data: true, .. } => Provider::Mylnikov,
            ProviderRequest::Mylnikov { open_data: false, .. } => Provider::MylnikovFull,
            ProviderRequest::AlterGeo { .. } => Provider::AlterGeo,
            ProviderRequest::YandexLocator { .. } => Provider::YandexLocator,
            ProviderRequest::YandexLegacy { .. } => Provider::YandexLegacy,
            ProviderRequest::Microsoft { .. } => Provider::Microsoft,
            ProviderRequest::Google { .. } => Provider::Google,
            ProviderRequest::Combain { .. } => Provider::Combain,
            ProviderRequest::Wigle { .. } => Provider::Wigle,
            ProviderRequest::WifiDb { .. } => Provider::WifiDb,
            ProviderRequest::OpenWifiMap { .. } => Provider::OpenWifiMap,
            ProviderRequest::FreifunkKarte { .. } => Provider::FreifunkKarte,
        }
    }

    /// Serializes the request for the wire.
    pub fn to_http(&self) -> Result<HttpRequestSpec, ProviderError> {
        let spec = match self {
            ProviderRequest::Apple { bssid } => HttpRequestSpec::post(
                "https://gs-loc.apple.com/clls/wloc",
                CONTENT_TYPE_FORM,
                apple::encode_request(bssid)?,
            )
            .header(USER_AGENT, APPLE_USER_AGENT),
            ProviderRequest::Mylnikov { bssid, open_data } => {
                let data = if *open_data { "&data=open" } else { "" };
                HttpRequestSpec::get(format!(
                    "https://api.mylnikov.org/geolocation/wifi?v=1.1{}&bssid={}",
                    data, bssid
                ))
            }
            ProviderRequest::AlterGeo { bssid } => HttpRequestSpec::post(
                "http://api.platform.altergeo.ru/loc/json",
                CONTENT_TYPE_JSON,
                geolocate::altergeo_body(bssid),
            ),
            ProviderRequest::YandexLocator { bssid, api_key } => HttpRequestSpec::post(
                "https://api.lbs.yandex.net/geolocation",
                CONTENT_TYPE_FORM,
                yandex::locator_body(bssid, api_key),
            ),
            ProviderRequest::YandexLegacy { bssid } => HttpRequestSpec::get(format!(
                "http://mobile.maps.yandex.net/cellid_location/?clid=1866854&lac=-1&cellid=-1&operatorid=null&countrycode=null&signalstrength=-1&wifinetworks={}:-65&app=ymetro",
                yandex::bare_mac(bssid)
            )),
            ProviderRequest::Microsoft { bssid } => HttpRequestSpec::post(
                "https://inference.location.live.net/inferenceservice/v21/Pox/GetLocationUsingFingerprint",
                CONTENT_TYPE_XML,
                microsoft::request_body(bssid, chrono::Utc::now()),
            ),
            ProviderRequest::Google { bssid, api_key } => HttpRequestSpec::post(
                Url::parse_with_params(
                    "https://www.googleapis.com/geolocation/v1/geolocate",
                    &[("key", api_key)],
                )?,
                CONTENT_TYPE_JSON,
                geolocate::google_body(bssid),
            ),
            ProviderRequest::Combain { bssid, api_key } => HttpRequestSpec::post(
                Url::parse_with_params("https://apiv2.combain.com", &[("key", api_key)])?,
                CONTENT_TYPE_JSON,
                geolocate::combain_body(bssid),
            ),
            ProviderRequest::Wigle { query, api_key } => {
                let param = match query {
                    SearchQuery::Mac(mac) => ("netid", mac.as_str()),
                    SearchQuery::Ssid(ssid) => ("ssid", ssid.as_str()),
                };
                HttpRequestSpec::get(Url::parse_with_params(
                    "https://api.wigle.net/api/v2/network/search",
                    &[param],
                )?)
                .header(ACCEPT, CONTENT_TYPE_JSON)
                .header(AUTHORIZATION, format!("Basic {}", api_key))
            }
            ProviderRequest::WifiDb { query } => HttpRequestSpec::get(Url::parse_with_params(
                "https://wifidb.net/wifidb/api/geojson.php",
                &[
                    ("func", "exp_search"),
                    ("mac", query.bssid().unwrap_or_default()),
                    ("ssid", query.ssid_name().unwrap_or_default()),
                    ("radio", ""),
                    ("chan", ""),
                    ("auth", ""),
                    ("encry", ""),
                    ("sectype", ""),
                    ("json", "0"),
                    ("labeled", "0"),
                ],
            )?),
            ProviderRequest::OpenWifiMap { ssid } => HttpRequestSpec::post(
                "https://api.openwifimap.net/view_nodes",
                CONTENT_TYPE_JSON,
                serde_json::json!({ "keys": [ssid] }).to_string().into_bytes(),
            )
            .header(ACCEPT, CONTENT_TYPE_JSON),
            ProviderRequest::FreifunkKarte { .. } => {
                HttpRequestSpec::get("https://www.freifunk-karte.de/data.php")
            }
        };
        Ok(spec)
    }

    /// Parses a response body. `Ok(None)` means the provider knows nothing
    /// about the query.
    pub fn parse(&self, body: &[u8]) -> Result<Option<LocationResult>, ProviderError> {
        let module = self.provider().name();
        match self {
            ProviderRequest::Apple { bssid } => apple::decode_response(body, bssid),
            ProviderRequest::Mylnikov { bssid, .. } => geolocate::parse_mylnikov(module, body, bssid),
            ProviderRequest::AlterGeo { bssid } => geolocate::parse_altergeo(body, bssid),
            ProviderRequest::YandexLocator { bssid, .. } => {
                yandex::parse_locator(&String::from_utf8_lossy(body), bssid)
            }
            ProviderRequest::YandexLegacy { bssid } => {
                yandex::parse_legacy(&String::from_utf8_lossy(body), bssid)
            }
            ProviderRequest::Microsoft { bssid } => {
                microsoft::parse_response(&String::from_utf8_lossy(body), bssid)
            }
            ProviderRequest::Google { bssid, .. } => geolocate::parse_google(body, bssid),
            ProviderRequest::Combain { bssid, .. } => geolocate::parse_combain(body, bssid),
            ProviderRequest::Wigle { query, .. } => community::parse_wigle(body, query),
            ProviderRequest::WifiDb { query } => community::parse_wifidb(body, query),
            ProviderRequest::OpenWifiMap { ssid } => community::parse_openwifimap(body, ssid),
            ProviderRequest::FreifunkKarte { ssid } => community::parse_freifunk(body, ssid),
        }
    }
}

/// A source of at most one location per search.
///
/// The aggregator only sees this trait; it runs every source concurrently
/// and never looks inside.
pub trait LocationSource: Send + Sync {
    /// Module name used in results and failure reports.
    fn module(&self) -> &str;

    /// Performs the lookup. `Ok(None)` is a clean "not found".
    fn locate(&self) -> BoxFuture<'_, Result<Option<LocationResult>, ProviderError>>;
}

/// A provider request executed over HTTP.
pub struct HttpSource {
    request: ProviderRequest,
    client: Arc<reqwest::Client>,
}

impl HttpSource {
    /// `client` carries the timeout for this provider.
    pub fn new(request: ProviderRequest, client: Arc<reqwest::Client>) -> Self {
        Self { request, client }
    }

    pub fn request(&self) -> &ProviderRequest {
        &self.request
    }

    async fn fetch(&self) -> Result<Option<LocationResult>, ProviderError> {
        let spec = self.request.to_http()?;
        debug!("{} {} {}", self.request.provider(), spec.method, spec.url);

        let mut builder = self.client.request(spec.method, &spec.url);
        for (name, value) in spec.headers {
            builder = builder.header(name, value);
        }
        if let Some((content_type, body)) = spec.body {
            builder = builder.header(CONTENT_TYPE, content_type).body(body);
        }

        let response = builder.send().await?.error_for_status()?;
        let body = response.bytes().await?;
        self.request.parse(&body)
    }
}

impl LocationSource for HttpSource {
    fn module(&self) -> &str {
        self.request.provider().name()
    }

    fn locate(&self) -> BoxFuture<'_, Result<Option<LocationResult>, ProviderError>> {
        Box::pin(self.fetch())
    }
}

/// Accepts a coordinate sent either as a JSON number or as a numeric string.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    Ok(
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
            None => None,
        },
    )
}
