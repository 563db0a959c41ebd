//! Rejection of placeholder coordinates.
//!
//! Several providers answer "unknown" with a fixed point instead of an error.
//! Those points are listed as data so new decoys can be added without a
//! rebuild (`--reject-rules rules.json`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error_handling::ConfigFileError;

/// One coordinate pattern that never counts as a location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RejectRule {
    /// Exact match on both coordinates
    Point { lat: f64, lon: f64 },
    /// Inclusive box
    BoundingBox {
        min_lat: f64,
        max_lat: f64,
        min_lon: f64,
        max_lon: f64,
    },
}

impl RejectRule {
    pub fn matches(&self, lat: f64, lon: f64) -> bool {
        match *self {
            RejectRule::Point { lat: plat, lon: plon } => lat == plat && lon == plon,
            RejectRule::BoundingBox {
                min_lat,
                max_lat,
                min_lon,
                max_lon,
            } => (min_lat..=max_lat).contains(&lat) && (min_lon..=max_lon).contains(&lon),
        }
    }
}

/// Accepts a coordinate unless a reject rule matches it.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateValidator {
    rules: Vec<RejectRule>,
}

impl Default for CoordinateValidator {
    fn default() -> Self {
        Self {
            rules: vec![
                RejectRule::Point { lat: 0.0, lon: 0.0 },
                RejectRule::Point {
                    lat: 12.3456,
                    lon: -7.891,
                },
                RejectRule::BoundingBox {
                    min_lat: 56.864,
                    max_lat: 56.865,
                    min_lon: 60.610,
                    max_lon: 60.612,
                },
            ],
        }
    }
}

impl CoordinateValidator {
    pub fn new(rules: Vec<RejectRule>) -> Self {
        Self { rules }
    }

    /// Loads rules from a JSON array file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigFileError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Io {
            path: display.clone(),
            source,
        })?;
        let rules = serde_json::from_str(&text).map_err(|source| ConfigFileError::Json {
            path: display,
            source,
        })?;
        Ok(Self::new(rules))
    }

    pub fn rules(&self) -> &[RejectRule] {
        &self.rules
    }

    /// True when the coordinate is finite and no rule rejects it.
    pub fn is_valid(&self, lat: f64, lon: f64) -> bool {
        lat.is_finite() && lon.is_finite() && !self.rules.iter().any(|r| r.matches(lat, lon))
    }
}
