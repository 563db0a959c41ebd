//! Application-level operations behind the CLI subcommands.
//!
//! This module provides:
//! - Loading keys and reject rules named by the configuration
//! - Running a search and opening the range resolver
//! - Output formatting and statistics printing

pub mod output;
pub mod statistics;

use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use crate::config::{Config, SetKeys};
use crate::initialization::init_registry_client;
use crate::ipranges::{IpRangeManager, RirClient};
use crate::locate::{ApiKeys, CoordinateValidator, Locator, SearchQuery, SearchReport};
use crate::storage::{init_db_pool_with_path, run_migrations, RangeCache};

pub use statistics::print_provider_statistics;

/// Stored keys with environment overrides applied.
pub fn load_keys(config: &Config) -> Result<ApiKeys> {
    let keys = ApiKeys::load(&config.keys_path)
        .with_context(|| format!("Failed to load API keys from {}", config.keys_path.display()))?;
    Ok(keys.with_env_overrides())
}

/// Applies `keys set` to the stored key file. Returns the stored keys
/// (without environment overrides).
pub fn update_keys(config: &Config, update: &SetKeys) -> Result<ApiKeys> {
    let current = ApiKeys::load(&config.keys_path)
        .with_context(|| format!("Failed to load API keys from {}", config.keys_path.display()))?;
    let trimmed = |v: &Option<String>| v.clone().map(|k| k.trim().to_string());
    let mut keys = current.merge(ApiKeys {
        wigle: trimmed(&update.wigle),
        google: trimmed(&update.google),
        combain: trimmed(&update.combain),
        yandex: trimmed(&update.yandex),
    });
    for slot in [&mut keys.wigle, &mut keys.google, &mut keys.combain, &mut keys.yandex] {
        if slot.as_deref().is_some_and(str::is_empty) {
            *slot = None;
        }
    }
    keys.save(&config.keys_path)
        .with_context(|| format!("Failed to save API keys to {}", config.keys_path.display()))?;
    info!("API keys saved to {}", config.keys_path.display());
    Ok(keys)
}

/// The built-in reject rules, or the file named by `--reject-rules`.
pub fn load_validator(config: &Config) -> Result<CoordinateValidator> {
    match &config.reject_rules {
        Some(path) => CoordinateValidator::from_file(path)
            .with_context(|| format!("Failed to load reject rules from {}", path.display())),
        None => Ok(CoordinateValidator::default()),
    }
}

/// Runs one geolocation search and logs provider statistics.
///
/// `Err` carries [`crate::LookupError::NoResults`] when nothing was found.
pub async fn run_search(config: &Config, query: SearchQuery) -> Result<SearchReport> {
    let keys = load_keys(config)?;
    let validator = load_validator(config)?;
    let locator = Locator::new(config, keys, validator).context("Failed to initialize HTTP clients")?;

    let outcome = locator.locate(query).await;
    print_provider_statistics(locator.stats());
    Ok(outcome?)
}

/// Opens (and migrates) the range cache.
pub async fn open_range_cache(config: &Config) -> Result<RangeCache> {
    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .with_context(|| format!("Failed to open range cache {}", config.db_path.display()))?;
    run_migrations(&pool)
        .await
        .context("Failed to run range cache migrations")?;
    Ok(RangeCache::new(pool))
}

/// Range resolver backed by the on-disk cache and the public registries.
pub async fn open_range_manager(config: &Config) -> Result<IpRangeManager> {
    let cache = open_range_cache(config).await?;
    let http = init_registry_client(config).context("Failed to initialize registry HTTP client")?;
    let registry = RirClient::new(http, Duration::from_secs(config.registry_timeout_seconds));
    Ok(IpRangeManager::new(cache, registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &tempfile::TempDir) -> Config {
        Config {
            keys_path: dir.path().join("keys.json"),
            db_path: dir.path().join("ranges.db"),
            ..Default::default()
        }
    }

    #[test]
    fn test_update_keys_keeps_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);

        update_keys(
            &config,
            &SetKeys {
                wigle: Some("w-key".into()),
                google: Some("g-key".into()),
                combain: None,
                yandex: None,
            },
        )
        .unwrap();

        let keys = update_keys(
            &config,
            &SetKeys {
                wigle: None,
                google: Some("".into()),
                combain: Some("c-key".into()),
                yandex: None,
            },
        )
        .unwrap();

        assert_eq!(keys.wigle.as_deref(), Some("w-key"));
        assert_eq!(keys.google, None);
        assert_eq!(keys.combain.as_deref(), Some("c-key"));
        assert_eq!(ApiKeys::load(&config.keys_path).unwrap(), keys);
    }

    #[test]
    fn test_load_validator_default_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        assert_eq!(load_validator(&config).unwrap().rules().len(), 3);

        let rules = dir.path().join("rules.json");
        std::fs::write(&rules, r#"[{"type":"point","lat":1.0,"lon":2.0}]"#).unwrap();
        config.reject_rules = Some(rules);
        let validator = load_validator(&config).unwrap();
        assert!(!validator.is_valid(1.0, 2.0));
        assert!(validator.is_valid(0.0, 0.0));
    }

    #[test]
    fn test_load_validator_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(&dir);
        config.reject_rules = Some(dir.path().join("absent.json"));
        assert!(load_validator(&config).is_err());
    }

    #[tokio::test]
    async fn test_open_range_cache_creates_database() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(&dir);
        let cache = open_range_cache(&config).await.unwrap();
        assert!(cache.list().await.unwrap().is_empty());
        assert!(config.db_path.exists());
    }
}
