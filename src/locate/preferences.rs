//! API key store.
//!
//! Keys live in a small JSON file; environment variables (and a `.env` file,
//! loaded by the binary) override whatever the file holds.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{ENV_COMBAIN_API_KEY, ENV_GOOGLE_API_KEY, ENV_WIGLE_API_KEY, ENV_YANDEX_API_KEY};
use crate::error_handling::ConfigFileError;

/// Credentials for the providers that require one. A missing or blank key
/// disables the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wigle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yandex: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ApiKeys {
    pub fn wigle(&self) -> Option<&str> {
        non_blank(&self.wigle)
    }

    pub fn google(&self) -> Option<&str> {
        non_blank(&self.google)
    }

    pub fn combain(&self) -> Option<&str> {
        non_blank(&self.combain)
    }

    pub fn yandex(&self) -> Option<&str> {
        non_blank(&self.yandex)
    }

    /// Reads the key file. A missing file is an empty key set.
    pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let display = path.display().to_string();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No key file at {}", display);
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigFileError::Io { path: display, source }),
        };
        serde_json::from_str(&text).map_err(|source| ConfigFileError::Json { path: display, source })
    }

    /// Writes the key file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let display = path.display().to_string();
        let io_err = |source| ConfigFileError::Io {
            path: display.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigFileError::Json {
            path: display.clone(),
            source,
        })?;
        std::fs::write(path, json).map_err(io_err)
    }

    /// Replaces keys with the non-empty values of the given environment lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(v) = pick(ENV_WIGLE_API_KEY) {
            self.wigle = Some(v);
        }
        if let Some(v) = pick(ENV_GOOGLE_API_KEY) {
            self.google = Some(v);
        }
        if let Some(v) = pick(ENV_COMBAIN_API_KEY) {
            self.combain = Some(v);
        }
        if let Some(v) = pick(ENV_YANDEX_API_KEY) {
            self.yandex = Some(v);
        }
        self
    }

    /// Overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Merges `other` into `self`; set fields in `other` win.
    pub fn merge(mut self, other: ApiKeys) -> Self {
        self.wigle = other.wigle.or(self.wigle);
        self.google = other.google.or(self.google);
        self.combain = other.combain.or(self.combain);
        self.yandex = other.yandex.or(self.yandex);
        self
    }
}
