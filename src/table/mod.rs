//! # Compound Table
//!
//! Loading and normalization of per-compound differential-expression exports.
//!
//! A compound table is a comma-separated file with one row per compound and,
//! for every pairwise comparison, a fold-change column and a p-value column,
//! alongside descriptive columns (identifier, name, formula, molecular weight).
//!
//! Exports from vendor software are frequently messy, so loading:
//!
//! 1. Decodes non-UTF-8 fields as ISO-8859-1
//! 2. Strips quotes and whitespace from headers and drops duplicate headers
//! 3. Skips rows with more cells than there are headers
//! 4. Normalizes every cell, turning blank or quote-only cells into missing values
//!
//! Numeric columns are parsed lazily through [`CompoundTable::numeric_column`],
//! which reports unparseable values instead of failing.

mod clean;
mod error;


use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

pub use clean::{clean_cell, clean_column_name, strip_nested_quotes};
pub use error::TableError;

/// Maximum number of distinct offending values kept for a parse report
pub const MAX_PARSE_SAMPLES: usize = 5;

/// Names of the descriptive columns of a compound table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Unique compound identifier column
    pub compound_id: String,
    /// Display name column
    pub name: String,
    /// Molecular formula column
    pub formula: String,
    /// Calculated molecular weight column
    pub molecular_weight: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            compound_id: "Compounds ID".to_string(),
            name: "Name".to_string(),
            formula: "Formula".to_string(),
            molecular_weight: "Calc. MW".to_string(),
        }
    }
}

impl FieldNames {
    /// Columns that must be present for a ranking run
    pub fn required(&self) -> [&str; 4] {
        [
            self.compound_id.as_str(),
            self.name.as_str(),
            self.formula.as_str(),
            self.molecular_weight.as_str(),
        ]
    }

    /// Candidate columns for the display name, in fallback order
    pub fn name_fallbacks(&self) -> [&str; 3] {
        [
            self.name.as_str(),
            self.formula.as_str(),
            self.molecular_weight.as_str(),
        ]
    }

    /// Resolve the display name of a row: name, then formula, then molecular weight.
    pub fn resolve_name(&self, table: &CompoundTable, row: usize) -> Option<String> {
        self.name_fallbacks()
            .iter()
            .find_map(|column| table.text(row, column).and_then(strip_nested_quotes))
    }
}

/// Problem found while parsing a numeric column
#[derive(Debug, Clone, PartialEq)]
pub enum NumericIssue {
    /// Some non-empty cells failed to parse
    PartiallyUnparseable {
        /// Number of cells that failed
        failed: usize,
        /// Distinct offending values, in encounter order
        samples: Vec<String>,
    },
    /// No cell in the column produced a number
    AllUnparseable {
        /// Distinct offending values, in encounter order
        samples: Vec<String>,
    },
}

/// A column parsed as floating-point values
#[derive(Debug, Clone)]
pub struct NumericColumn {
    /// One entry per row; `None` for missing or unparseable cells
    pub values: Vec<Option<f64>>,
    /// Parse problem, if any
    pub issue: Option<NumericIssue>,
}

/// A loaded, normalized compound table
#[derive(Debug, Clone, Default)]
pub struct CompoundTable {
    columns: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<Vec<Option<String>>>,
}

impl CompoundTable {
    /// Build a table from already-normalized columns and cells.
    ///
    /// Duplicate column names keep their first occurrence.
    pub fn new(
        columns: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, TableError> {
        let width = columns.len();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(TableError::RowWidth {
                row,
                found: cells.len(),
                expected: width,
            });
        }

        let keep = first_occurrences(&columns);
        let columns: Vec<String> = keep.iter().map(|&i| columns[i].clone()).collect();
        let rows: Vec<Vec<Option<String>>> = rows
            .into_iter()
            .map(|mut r| keep.iter().map(|&i| r[i].take()).collect::<Vec<_>>())
            .collect();

        let index: HashMap<String, usize> = columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        Ok(Self {
            columns,
            index,
            rows,
        })
    }

    /// Load a comma-separated compound table from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a comma-separated compound table from a reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .flexible(true)
            .has_headers(true)
            .from_reader(reader);

        let raw_headers = csv_reader.byte_headers()?.clone();
        if raw_headers.is_empty() {
            return Err(TableError::MissingHeader);
        }

        let headers: Vec<String> = raw_headers
            .iter()
            .map(|h| clean_column_name(&clean::decode_latin1(h)))
            .collect();
        let width = headers.len();

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for record in csv_reader.byte_records() {
            let record = record?;
            if record.len() > width {
                skipped += 1;
                continue;
            }

            let mut cells: Vec<Option<String>> = record
                .iter()
                .map(|field| clean_cell(&clean::decode_latin1(field)))
                .collect();
            cells.resize(width, None);
            rows.push(cells);
        }

        if skipped > 0 {
            warn!("Skipped {} malformed rows with too many fields", skipped);
        }

        let table = Self::new(headers, rows)?;
        debug!(
            "Loaded compound table: {} columns, {} rows",
            table.columns.len(),
            table.rows.len()
        );
        Ok(table)
    }

    /// Column names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fail with every absent column name if any of `names` is missing
    pub fn require_columns(&self, names: &[&str]) -> Result<(), TableError> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.has_column(n))
            .map(|n| n.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TableError::MissingColumns(missing))
        }
    }

    /// Cell text at `row` in `column`, or `None` if missing
    pub fn text(&self, row: usize, column: &str) -> Option<&str> {
        let col = *self.index.get(column)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// Parse a column as floating-point values.
    ///
    /// Returns `None` when the column does not exist.
    pub fn numeric_column(&self, column: &str) -> Option<NumericColumn> {
        let col = *self.index.get(column)?;

        let mut failed = 0usize;
        let mut samples: Vec<String> = Vec::new();
        let values: Vec<Option<f64>> = self
            .rows
            .iter()
            .map(|row| {
                let cell = row[col].as_deref()?;
                match cell.parse::<f64>() {
                    Ok(v) if !v.is_nan() => Some(v),
                    _ => {
                        failed += 1;
                        if samples.len() < MAX_PARSE_SAMPLES && !samples.iter().any(|s| s == cell) {
                            samples.push(cell.to_string());
                        }
                        None
                    }
                }
            })
            .collect();

        let issue = if !values.is_empty() && values.iter().all(Option::is_none) {
            Some(NumericIssue::AllUnparseable { samples })
        } else if failed > 0 {
            Some(NumericIssue::PartiallyUnparseable { failed, samples })
        } else {
            None
        };

        Some(NumericColumn { values, issue })
    }
}

fn first_occurrences(columns: &[String]) -> Vec<usize> {
    let mut seen = std::collections::HashSet::new();
    let keep: Vec<usize> = columns
        .iter()
        .enumerate()
        .filter(|(_, c)| seen.insert(c.as_str()))
        .map(|(i, _)| i)
        .collect();

    if keep.len() < columns.len() {
        debug!("Dropped {} duplicate columns", columns.len() - keep.len());
    }
    keep
}
