//! Error handling and provider statistics.
//!
//! This module provides:
//! - Error type definitions for every layer (initialization, storage,
//!   providers, registries, searches)
//! - Provider outcome statistics (failures by category, found/empty/rejected)
//! - Error type extraction from `reqwest` errors

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use stats::ProviderStats;
pub use types::{
    ConfigFileError, DatabaseError, ErrorType, InitializationError, LookupError, OutcomeType,
    ProviderError, RegistryError,
};
