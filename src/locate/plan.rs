//! Which providers run for a query.
//!
//! Plans are static tables of `(provider, requirement)`; evaluating one
//! against the key store yields the concrete requests for a search.

use std::sync::Arc;

use log::debug;

use super::preferences::ApiKeys;
use super::providers::{HttpSource, LocationSource, Provider, ProviderRequest};
use super::types::SearchQuery;

/// What a provider needs before it can be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Always,
    WigleKey,
    GoogleKey,
    CombainKey,
    YandexKey,
}

impl Requirement {
    fn key<'a>(&self, keys: &'a ApiKeys) -> Option<Option<&'a str>> {
        match self {
            Requirement::Always => Some(None),
            Requirement::WigleKey => keys.wigle().map(Some),
            Requirement::GoogleKey => keys.google().map(Some),
            Requirement::CombainKey => keys.combain().map(Some),
            Requirement::YandexKey => keys.yandex().map(Some),
        }
    }
}

pub const MAC_PLAN: &[(Provider, Requirement)] = &[
    (Provider::Apple, Requirement::Always),
    (Provider::Mylnikov, Requirement::Always),
    (Provider::MylnikovFull, Requirement::Always),
    (Provider::AlterGeo, Requirement::Always),
    (Provider::YandexLocator, Requirement::YandexKey),
    (Provider::YandexLegacy, Requirement::Always),
    (Provider::Microsoft, Requirement::Always),
    (Provider::Google, Requirement::GoogleKey),
    (Provider::Combain, Requirement::CombainKey),
    (Provider::Wigle, Requirement::WigleKey),
    (Provider::WifiDb, Requirement::Always),
];

pub const SSID_PLAN: &[(Provider, Requirement)] = &[
    (Provider::FreifunkKarte, Requirement::Always),
    (Provider::OpenWifiMap, Requirement::Always),
    (Provider::Wigle, Requirement::WigleKey),
    (Provider::WifiDb, Requirement::Always),
];

pub fn plan_for(query: &SearchQuery) -> &'static [(Provider, Requirement)] {
    match query {
        SearchQuery::Mac(_) => MAC_PLAN,
        SearchQuery::Ssid(_) => SSID_PLAN,
    }
}

/// Builds the request for one provider, or `None` if the provider cannot
/// serve this kind of query.
fn request_for(provider: Provider, query: &SearchQuery, key: Option<&str>) -> Option<ProviderRequest> {
    let key = key.unwrap_or_default().to_string();
    let request = match (provider, query) {
        (Provider::Wigle, _) => ProviderRequest::Wigle {
            query: query.clone(),
            api_key: key,
        },
        (Provider::WifiDb, _) => ProviderRequest::WifiDb {
            query: query.clone(),
        },
        (Provider::OpenWifiMap, SearchQuery::Ssid(ssid)) => ProviderRequest::OpenWifiMap { ssid: ssid.clone() },
        (Provider::FreifunkKarte, SearchQuery::Ssid(ssid)) => {
            ProviderRequest::FreifunkKarte { ssid: ssid.clone() }
        }
        (_, SearchQuery::Ssid(_)) => return None,
        (Provider::OpenWifiMap | Provider::FreifunkKarte, SearchQuery::Mac(_)) => return None,
        (Provider::Apple, SearchQuery::Mac(bssid)) => ProviderRequest::Apple { bssid: bssid.clone() },
        (Provider::Mylnikov, SearchQuery::Mac(bssid)) => ProviderRequest::Mylnikov {
            bssid: bssid.clone(),
            open_data: true,
        },
        (Provider::MylnikovFull, SearchQuery::Mac(bssid)) => ProviderRequest::Mylnikov {
            bssid: bssid.clone(),
            open_data: false,
        },
        (Provider::AlterGeo, SearchQuery::Mac(bssid)) => ProviderRequest::AlterGeo { bssid: bssid.clone() },
        (Provider::YandexLocator, SearchQuery::Mac(bssid)) => ProviderRequest::YandexLocator {
            bssid: bssid.clone(),
            api_key: key,
        },
        (Provider::YandexLegacy, SearchQuery::Mac(bssid)) => {
            ProviderRequest::YandexLegacy { bssid: bssid.clone() }
        }
        (Provider::Microsoft, SearchQuery::Mac(bssid)) => ProviderRequest::Microsoft { bssid: bssid.clone() },
        (Provider::Google, SearchQuery::Mac(bssid)) => ProviderRequest::Google {
            bssid: bssid.clone(),
            api_key: key,
        },
        (Provider::Combain, SearchQuery::Mac(bssid)) => ProviderRequest::Combain {
            bssid: bssid.clone(),
            api_key: key,
        },
    };
    Some(request)
}

/// Evaluates the query's plan against `keys`. Providers whose key is missing
/// are skipped.
pub fn build_requests(query: &SearchQuery, keys: &ApiKeys) -> Vec<ProviderRequest> {
    plan_for(query)
        .iter()
        .filter_map(|(provider, requirement)| match requirement.key(keys) {
            Some(key) => request_for(*provider, query, key),
            None => {
                debug!("Skipping {}: no API key configured", provider);
                None
            }
        })
        .collect()
}

/// Wraps requests in HTTP sources. WifiDB gets `wifidb_client`, which
/// carries its longer timeout; everything else shares `client`.
pub fn build_sources(
    requests: Vec<ProviderRequest>,
    client: &Arc<reqwest::Client>,
    wifidb_client: &Arc<reqwest::Client>,
) -> Vec<Arc<dyn LocationSource>> {
    requests
        .into_iter()
        .map(|request| {
            let client = match request.provider() {
                Provider::WifiDb => Arc::clone(wifidb_client),
                _ => Arc::clone(client),
            };
            Arc::new(HttpSource::new(request, client)) as Arc<dyn LocationSource>
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn providers(requests: &[ProviderRequest]) -> Vec<Provider> {
        requests.iter().map(|r| r.provider()).collect()
    }

    fn mac() -> SearchQuery {
        SearchQuery::Mac("00:11:22:aa:bb:cc".into())
    }

    #[test]
    fn test_mac_plan_without_keys() {
        let requests = build_requests(&mac(), &ApiKeys::default());
        assert_eq!(
            providers(&requests),
            vec![
                Provider::Apple,
                Provider::Mylnikov,
                Provider::MylnikovFull,
                Provider::AlterGeo,
                Provider::YandexLegacy,
                Provider::Microsoft,
                Provider::WifiDb,
            ]
        );
    }

    #[test]
    fn test_mac_plan_with_all_keys() {
        let keys = ApiKeys {
            wigle: Some("w".into()),
            google: Some("g".into()),
            combain: Some("c".into()),
            yandex: Some("y".into()),
        };
        let requests = build_requests(&mac(), &keys);
        assert_eq!(requests.len(), MAC_PLAN.len());
        assert!(requests.contains(&ProviderRequest::Google {
            bssid: "00:11:22:aa:bb:cc".into(),
            api_key: "g".into(),
        }));
        assert!(requests.contains(&ProviderRequest::YandexLocator {
            bssid: "00:11:22:aa:bb:cc".into(),
            api_key: "y".into(),
        }));
    }

    #[test]
    fn test_blank_key_disables_provider() {
        let keys = ApiKeys {
            google: Some("  ".into()),
            ..Default::default()
        };
        let requests = build_requests(&mac(), &keys);
        assert!(!providers(&requests).contains(&Provider::Google));
    }

    #[test]
    fn test_ssid_plan() {
        let query = SearchQuery::Ssid("CoffeeShop".into());
        let requests = build_requests(&query, &ApiKeys::default());
        assert_eq!(
            providers(&requests),
            vec![Provider::FreifunkKarte, Provider::OpenWifiMap, Provider::WifiDb]
        );

        let keys = ApiKeys {
            wigle: Some("w".into()),
            ..Default::default()
        };
        let requests = build_requests(&query, &keys);
        assert!(requests.contains(&ProviderRequest::Wigle {
            query: query.clone(),
            api_key: "w".into(),
        }));
    }

    #[test]
    fn test_build_sources_keeps_plan_order() {
        let client = Arc::new(reqwest::Client::new());
        let slow = Arc::new(reqwest::Client::new());
        let requests = build_requests(&SearchQuery::Ssid("x".into()), &ApiKeys::default());
        let sources = build_sources(requests, &client, &slow);
        let modules: Vec<_> = sources.iter().map(|s| s.module().to_string()).collect();
        assert_eq!(modules, vec!["freifunk-karte", "openwifimap", "wifidb"]);
    }
}
