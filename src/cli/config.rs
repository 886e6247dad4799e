//! TOML configuration file support.
//!
//! Ranking parameters and column names can be kept in a config file instead of
//! being passed as flags:
//!
//! ```toml
//! # volcanorank.toml
//! [ranking]
//! distance_threshold = 5.0
//! max_results = 100
//! sort_by_distance = false
//!
//! [fields]
//! compound_id = "Compound ID"
//! molecular_weight = "MW"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use volcanorank::table::FieldNames;

/// Root configuration structure for volcanorank.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Ranking-specific settings.
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Descriptive column names; unset names keep their defaults.
    #[serde(default)]
    pub fields: FieldNames,
}

/// Configuration for the rank command.
#[derive(Debug, Default, Deserialize)]
pub struct RankingConfig {
    /// Keep compounds whose total distance is strictly below this value.
    pub distance_threshold: Option<f64>,

    /// Maximum number of compounds in the output.
    pub max_results: Option<usize>,

    /// Sort by ascending distance before truncating.
    pub sort_by_distance: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
