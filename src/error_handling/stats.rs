//! Provider outcome statistics.
//!
//! Thread-safe counters for provider failures and non-error outcomes,
//! shared by every provider task of a search.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ErrorType, OutcomeType};

/// Thread-safe provider statistics tracker.
///
/// Every counter is created up front so increments never allocate and never
/// need a lock; the struct can be shared across tasks using `Arc`.
pub struct ProviderStats {
    errors: HashMap<ErrorType, AtomicUsize>,
    outcomes: HashMap<OutcomeType, AtomicUsize>,
}

impl ProviderStats {
    pub fn new() -> Self {
        let mut errors = HashMap::new();
        for error in ErrorType::iter() {
            errors.insert(error, AtomicUsize::new(0));
        }

        let mut outcomes = HashMap::new();
        for outcome in OutcomeType::iter() {
            outcomes.insert(outcome, AtomicUsize::new(0));
        }

        ProviderStats { errors, outcomes }
    }

    /// Increment an error counter.
    pub fn increment_error(&self, error: ErrorType) {
        if let Some(counter) = self.errors.get(&error) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment error counter for {:?} which is not in the map",
                error
            );
        }
    }

    /// Increment an outcome counter.
    pub fn increment_outcome(&self, outcome: OutcomeType) {
        if let Some(counter) = self.outcomes.get(&outcome) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment outcome counter for {:?} which is not in the map",
                outcome
            );
        }
    }

    pub fn get_error_count(&self, error: ErrorType) -> usize {
        self.errors
            .get(&error)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    pub fn get_outcome_count(&self, outcome: OutcomeType) -> usize {
        self.outcomes
            .get(&outcome)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Get total error count across all error types.
    pub fn total_errors(&self) -> usize {
        ErrorType::iter().map(|e| self.get_error_count(e)).sum()
    }

    /// Get total outcome count across all outcome types.
    pub fn total_outcomes(&self) -> usize {
        OutcomeType::iter().map(|o| self.get_outcome_count(o)).sum()
    }
}

impl Default for ProviderStats {
    fn default() -> Self {
        Self::new()
    }
}
