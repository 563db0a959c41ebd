//! Search entry point tying plan, HTTP clients and aggregator together.

use std::sync::Arc;

use tokio::sync::watch;

use super::aggregator::Aggregator;
use super::plan::{build_requests, build_sources};
use super::preferences::ApiKeys;
use super::types::{SearchProgress, SearchQuery, SearchReport};
use super::validate::CoordinateValidator;
use crate::config::Config;
use crate::error_handling::{InitializationError, LookupError, ProviderStats};
use crate::initialization::init_client;

/// Geolocates access points with every provider the key set enables.
///
/// # Examples
///
/// ```no_run
/// use wifi_locator::{ApiKeys, Config, CoordinateValidator, Locator, SearchQuery};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let locator = Locator::new(&Config::default(), ApiKeys::default(), CoordinateValidator::default())?;
/// let report = locator.locate(SearchQuery::mac("00:11:22:33:44:55")?).await?;
/// for result in &report.results {
///     println!("{}: {:?}", result.module, result.coordinates());
/// }
/// # Ok(())
/// # }
/// ```
pub struct Locator {
    client: Arc<reqwest::Client>,
    wifidb_client: Arc<reqwest::Client>,
    keys: ApiKeys,
    aggregator: Aggregator,
}

impl Locator {
    /// Builds the provider HTTP clients from `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if a client cannot be built.
    pub fn new(
        config: &Config,
        keys: ApiKeys,
        validator: CoordinateValidator,
    ) -> Result<Self, InitializationError> {
        Ok(Self {
            client: init_client(config, config.provider_timeout_seconds)?,
            wifidb_client: init_client(config, config.wifidb_timeout_seconds)?,
            keys,
            aggregator: Aggregator::new(validator),
        })
    }

    pub fn keys(&self) -> &ApiKeys {
        &self.keys
    }

    pub fn stats(&self) -> &ProviderStats {
        self.aggregator.stats()
    }

    pub async fn locate(&self, query: SearchQuery) -> Result<SearchReport, LookupError> {
        let (progress, _) = watch::channel(SearchProgress::default());
        self.locate_with_progress(query, &progress).await
    }

    /// Like [`Locator::locate`], publishing progress to `progress`'s receivers.
    pub async fn locate_with_progress(
        &self,
        query: SearchQuery,
        progress: &watch::Sender<SearchProgress>,
    ) -> Result<SearchReport, LookupError> {
        let requests = build_requests(&query, &self.keys);
        let sources = build_sources(requests, &self.client, &self.wifidb_client);
        self.aggregator
            .search_with_progress(query, sources, progress)
            .await
    }
}
