//! # Comparison Registry
//!
//! A comparison is one pairwise experimental contrast, identified by the
//! fold-change column and p-value column that hold its results. The registry
//! maps a dataset identifier (conventionally the path of the compound table)
//! to the ordered list of comparisons found in that dataset, and is persisted
//! as JSON:
//!
//! ```json
//! {
//!     "ReSpleen.csv": [
//!         {
//!             "fold_change_col": "Log2 Fold Change: (Treated) / (Control)",
//!             "p_value_col": "P-value: (Treated) / (Control)",
//!             "title": "Volcano Plot: (Treated) / (Control)"
//!         }
//!     ]
//! }
//! ```
//!
//! Comparisons are derived from table headers by [`extract_comparisons`].

mod error;
mod extract;


use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::table::clean_column_name;

pub use error::RegistryError;
pub use extract::{extract_comparisons, extract_from_path, fold_change_key, p_value_key};

/// Fields of a compound table that hold the results of one comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSpec {
    /// Column holding log2 fold changes
    pub fold_change_col: String,
    /// Column holding p-values
    pub p_value_col: String,
    /// Human-readable title
    pub title: String,
}

impl ComparisonSpec {
    /// Create a new comparison descriptor
    pub fn new(
        fold_change_col: impl Into<String>,
        p_value_col: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            fold_change_col: fold_change_col.into(),
            p_value_col: p_value_col.into(),
            title: title.into(),
        }
    }

    /// Column holding log2 fold changes
    pub fn fold_change_field(&self) -> &str {
        &self.fold_change_col
    }

    /// Column holding p-values
    pub fn p_value_field(&self) -> &str {
        &self.p_value_col
    }

    /// Human-readable title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Normalize column references the same way table headers are normalized,
    /// and strip escape debris from the title.
    pub fn cleaned(self) -> Self {
        Self {
            fold_change_col: clean_column_name(&self.fold_change_col.replace('\\', "")),
            p_value_col: clean_column_name(&self.p_value_col.replace('\\', "")),
            title: clean_key(&self.title),
        }
    }
}

/// Remove quotes and backslashes, collapse whitespace runs and trim.
pub fn clean_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c != '"' && *c != '\\')
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dataset identifier to ordered comparison list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonRegistry {
    datasets: BTreeMap<String, Vec<ComparisonSpec>>,
}

impl ComparisonRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let file = File::open(path)?;
        let registry: Self = serde_json::from_reader(BufReader::new(file))?;
        Ok(registry.normalized())
    }

    /// Parse a registry from a JSON string
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let registry: Self = serde_json::from_str(json)?;
        Ok(registry.normalized())
    }

    /// Serialize to JSON with four-space indentation
    pub fn to_json(&self) -> Result<String, RegistryError> {
        let mut buf = Vec::new();
        self.write_pretty(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Save the registry as JSON, replacing any existing file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RegistryError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_pretty(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Replace the comparisons of one dataset
    pub fn insert(&mut self, dataset_id: impl Into<String>, specs: Vec<ComparisonSpec>) {
        self.datasets.insert(
            dataset_id.into(),
            specs.into_iter().map(ComparisonSpec::cleaned).collect(),
        );
    }

    /// Comparisons registered for a dataset; empty when the dataset is unknown
    pub fn comparisons_for(&self, dataset_id: &str) -> &[ComparisonSpec] {
        self.datasets
            .get(dataset_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Registered dataset identifiers, sorted
    pub fn dataset_ids(&self) -> impl Iterator<Item = &str> {
        self.datasets.keys().map(String::as_str)
    }

    fn normalized(self) -> Self {
        let datasets = self
            .datasets
            .into_iter()
            .map(|(id, specs)| (id, specs.into_iter().map(ComparisonSpec::cleaned).collect()))
            .collect();
        Self { datasets }
    }

    fn write_pretty<W: Write>(&self, writer: W) -> Result<(), RegistryError> {
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut serializer)?;
        Ok(())
    }
}
