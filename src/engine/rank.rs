use std::collections::HashMap;

use super::aggregate::AggregateResult;
use super::report::{Diagnostic, RunReport};
use super::{EngineConfig, ResultOrder};
use crate::table::{strip_nested_quotes, CompoundTable, FieldNames};

/// Name values treated as unresolved even when present
const PLACEHOLDER_NAMES: [&str; 3] = ["", "\"\"", "``"];

/// Descriptive fields of one compound
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundMetadata {
    /// Calculated molecular weight, as written in the table
    pub molecular_weight: Option<String>,
    /// Display name after the name, formula, molecular weight fallback
    pub name: Option<String>,
}

/// Descriptive metadata keyed by compound identifier
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    by_id: HashMap<String, CompoundMetadata>,
    duplicates: usize,
}

impl MetadataIndex {
    /// Index every row that has a compound identifier; the first row per identifier wins.
    pub fn from_table(table: &CompoundTable, fields: &FieldNames) -> Self {
        let mut index = Self::default();
        for row in 0..table.len() {
            let Some(id) = table.text(row, &fields.compound_id) else {
                continue;
            };
            if index.by_id.contains_key(id) {
                index.duplicates += 1;
                continue;
            }
            let metadata = CompoundMetadata {
                molecular_weight: table
                    .text(row, &fields.molecular_weight)
                    .and_then(strip_nested_quotes),
                name: fields.resolve_name(table, row),
            };
            index.by_id.insert(id.to_string(), metadata);
        }
        index
    }

    /// Add or replace one compound's metadata
    pub fn insert(&mut self, compound_id: impl Into<String>, metadata: CompoundMetadata) {
        self.by_id.insert(compound_id.into(), metadata);
    }

    /// Metadata of a compound
    pub fn get(&self, compound_id: &str) -> Option<&CompoundMetadata> {
        self.by_id.get(compound_id)
    }

    /// Number of indexed compounds
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether no compound is indexed
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Rows ignored because their identifier was already indexed
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }
}

/// One row of the final result
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRecord {
    /// Compound identifier
    pub compound_id: String,
    /// Calculated molecular weight
    pub molecular_weight: Option<String>,
    /// Resolved display name
    pub name: Option<String>,
    /// Aggregate corner distance
    pub total_distance: f64,
}

impl RankedRecord {
    /// Whether the name is missing or a placeholder
    pub fn has_unresolved_name(&self) -> bool {
        match &self.name {
            None => true,
            Some(name) => PLACEHOLDER_NAMES.contains(&name.trim()),
        }
    }
}

/// Final ranked, filtered and truncated result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankedTable {
    /// Records in output order
    pub records: Vec<RankedRecord>,
}

impl RankedTable {
    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no compound survived filtering
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in output order
    pub fn iter(&self) -> std::slice::Iter<'_, RankedRecord> {
        self.records.iter()
    }
}

/// Join aggregates with metadata, filter by threshold and truncate.
///
/// Aggregates keep their incoming order unless `config.order` asks for
/// ascending distance. Diagnostics for join gaps, empty results and
/// unresolved names go to `report`.
pub fn rank(
    aggregates: Vec<AggregateResult>,
    metadata: &MetadataIndex,
    config: &EngineConfig,
    report: &mut RunReport,
) -> RankedTable {
    let mut missing = 0usize;
    let mut records: Vec<RankedRecord> = aggregates
        .into_iter()
        .filter_map(|aggregate| {
            let Some(meta) = metadata.get(&aggregate.compound_id) else {
                missing += 1;
                return None;
            };
            Some(RankedRecord {
                compound_id: aggregate.compound_id,
                molecular_weight: meta.molecular_weight.clone(),
                name: meta.name.clone(),
                total_distance: aggregate.total_distance,
            })
        })
        .filter(|record| record.total_distance < config.distance_threshold)
        .collect();

    if missing > 0 {
        report.push(Diagnostic::MetadataJoinGap { missing });
    }

    if records.is_empty() {
        report.push(Diagnostic::EmptyResultSet);
        return RankedTable::default();
    }

    if config.order == ResultOrder::AscendingDistance {
        records.sort_by(|a, b| a.total_distance.total_cmp(&b.total_distance));
    }
    records.truncate(config.max_results);

    let unresolved: Vec<String> = records
        .iter()
        .filter(|r| r.has_unresolved_name())
        .map(|r| r.compound_id.clone())
        .collect();
    if !unresolved.is_empty() {
        report.push(Diagnostic::UnresolvedNames {
            compound_ids: unresolved,
        });
    }

    RankedTable { records }
}
