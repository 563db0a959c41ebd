//! Concurrent provider fan-out.
//!
//! One task per source, one mpsc channel, one collector. Each task reports
//! exactly one [`ProviderOutcome`]; the collector owns the result list and
//! republishes it through a `watch` channel after every message. The search
//! is complete when the channel closes, i.e. when every task has finished.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::{mpsc, watch};

use super::providers::LocationSource;
use super::types::{LocationResult, SearchProgress, SearchQuery, SearchReport};
use super::validate::CoordinateValidator;
use crate::error_handling::{ErrorType, LookupError, OutcomeType, ProviderStats};

/// What one provider task produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome {
    /// A location that passed validation.
    Found(LocationResult),
    /// The provider answered but knew nothing.
    Empty,
    /// A location matching a reject rule.
    Rejected(LocationResult),
    /// Transport, decode or task failure.
    Failed { error: String, error_type: Option<ErrorType> },
}

#[derive(Debug)]
struct OutcomeMessage {
    module: String,
    outcome: ProviderOutcome,
}

/// Runs sources concurrently and merges their answers.
pub struct Aggregator {
    validator: Arc<CoordinateValidator>,
    stats: Arc<ProviderStats>,
}

impl Aggregator {
    pub fn new(validator: CoordinateValidator) -> Self {
        Self {
            validator: Arc::new(validator),
            stats: Arc::new(ProviderStats::new()),
        }
    }

    /// Counters accumulated over every search run by this aggregator.
    pub fn stats(&self) -> &ProviderStats {
        &self.stats
    }

    /// Runs a search without observers.
    pub async fn search(
        &self,
        query: SearchQuery,
        sources: Vec<Arc<dyn LocationSource>>,
    ) -> Result<SearchReport, LookupError> {
        let (progress, _) = watch::channel(SearchProgress::default());
        self.search_with_progress(query, sources, &progress).await
    }

    /// Runs a search, publishing a [`SearchProgress`] snapshot after launch
    /// and after every provider outcome. The last snapshot has
    /// `finished == true`.
    ///
    /// # Errors
    ///
    /// [`LookupError::NoResults`] when every provider completed without an
    /// accepted location. Provider failures are reported in
    /// [`SearchReport::failures`], never as errors.
    pub async fn search_with_progress(
        &self,
        query: SearchQuery,
        sources: Vec<Arc<dyn LocationSource>>,
        progress: &watch::Sender<SearchProgress>,
    ) -> Result<SearchReport, LookupError> {
        let launched = sources.len();
        info!("Querying {} providers for {}", launched, query);

        let (tx, mut rx) = mpsc::channel::<OutcomeMessage>(launched.max(1));
        for source in sources {
            let tx = tx.clone();
            let validator = Arc::clone(&self.validator);
            tokio::spawn(async move {
                let module = source.module().to_string();
                let outcome = run_source(source, &validator).await;
                // The collector outlives every sender; a send error means the
                // search itself was dropped.
                let _ = tx.send(OutcomeMessage { module, outcome }).await;
            });
        }
        drop(tx);

        let mut snapshot = SearchProgress {
            launched,
            ..Default::default()
        };
        progress.send_replace(snapshot.clone());

        let mut seen: HashSet<(String, u64, u64)> = HashSet::new();
        let mut failures = Vec::new();

        while let Some(OutcomeMessage { module, outcome }) = rx.recv().await {
            snapshot.completed += 1;
            match outcome {
                ProviderOutcome::Found(result) => {
                    self.stats.increment_outcome(OutcomeType::Found);
                    let key = dedupe_key(&result);
                    if seen.insert(key) {
                        info!(
                            "{}: {:?}, {:?}",
                            module,
                            result.latitude.unwrap_or_default(),
                            result.longitude.unwrap_or_default()
                        );
                        snapshot.results.push(result);
                    } else {
                        debug!("{}: duplicate result dropped", module);
                    }
                }
                ProviderOutcome::Empty => {
                    self.stats.increment_outcome(OutcomeType::Empty);
                    debug!("{}: no location", module);
                }
                ProviderOutcome::Rejected(result) => {
                    self.stats.increment_outcome(OutcomeType::Rejected);
                    info!(
                        "{}: rejected placeholder coordinate {:?}",
                        module,
                        result.coordinates()
                    );
                }
                ProviderOutcome::Failed { error, error_type } => {
                    if let Some(error_type) = error_type {
                        self.stats.increment_error(error_type);
                    }
                    warn!("{}: {}", module, error);
                    failures.push(LocationResult::failed(module, error));
                }
            }
            progress.send_replace(snapshot.clone());
        }

        snapshot.finished = true;
        progress.send_replace(snapshot.clone());
        info!(
            "Search finished: {} of {} providers completed, {} results, {} failures",
            snapshot.completed,
            launched,
            snapshot.results.len(),
            failures.len()
        );

        if snapshot.results.is_empty() {
            return Err(LookupError::NoResults);
        }
        Ok(SearchReport {
            query,
            results: snapshot.results,
            failures,
            providers_launched: launched,
            providers_completed: snapshot.completed,
        })
    }
}

/// Runs one source to a single outcome. The call runs in its own task so a
/// panic inside the source becomes a failure and the outcome is still sent.
async fn run_source(source: Arc<dyn LocationSource>, validator: &CoordinateValidator) -> ProviderOutcome {
    debug!("{}: started", source.module());
    let call = tokio::spawn(async move { source.locate().await });
    match call.await {
        Ok(Ok(Some(location))) => classify(location, validator),
        Ok(Ok(None)) => ProviderOutcome::Empty,
        Ok(Err(e)) => ProviderOutcome::Failed {
            error: e.to_string(),
            error_type: Some(e.error_type()),
        },
        Err(join_error) => ProviderOutcome::Failed {
            error: format!("provider task panicked: {}", join_error),
            error_type: None,
        },
    }
}

fn classify(location: LocationResult, validator: &CoordinateValidator) -> ProviderOutcome {
    match location.coordinates() {
        Some((lat, lon)) if validator.is_valid(lat, lon) => ProviderOutcome::Found(location),
        Some(_) => ProviderOutcome::Rejected(location),
        None => ProviderOutcome::Empty,
    }
}

fn dedupe_key(result: &LocationResult) -> (String, u64, u64) {
    (
        result.module.clone(),
        result.latitude.unwrap_or_default().to_bits(),
        result.longitude.unwrap_or_default().to_bits(),
    )
}
