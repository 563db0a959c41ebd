//! End-of-search statistics.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, OutcomeType, ProviderStats};

/// Logs outcome and failure counts, skipping zero counters.
pub fn print_provider_statistics(stats: &ProviderStats) {
    let total_outcomes = stats.total_outcomes();
    let total_errors = stats.total_errors();

    if total_outcomes > 0 {
        info!("Provider outcomes ({} total):", total_outcomes);
        for outcome in OutcomeType::iter() {
            let count = stats.get_outcome_count(outcome);
            if count > 0 {
                info!("   {}: {}", outcome.as_str(), count);
            }
        }
    }

    if total_errors > 0 {
        info!("Provider failures ({} total):", total_errors);
        for error_type in ErrorType::iter() {
            let count = stats.get_error_count(error_type);
            if count > 0 {
                info!("   {}: {}", error_type.as_str(), count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_provider_statistics_empty() {
        // Should not panic when nothing was counted
        print_provider_statistics(&ProviderStats::new());
    }

    #[test]
    fn test_print_provider_statistics_mixed() {
        let stats = ProviderStats::new();
        stats.increment_outcome(OutcomeType::Found);
        stats.increment_outcome(OutcomeType::Rejected);
        stats.increment_error(ErrorType::HttpRequestUnauthorized);
        print_provider_statistics(&stats);
    }
}
