//! # Compound Distance Aggregation Engine
//!
//! Ranks compounds by how close their differential-expression results sit to
//! the extreme corners of significance space, across every comparison of a
//! dataset.
//!
//! ## Pipeline
//!
//! 1. **Corner distances** ([`corner_distances`]): for each comparison, every
//!    valid row becomes a point `(log2 FC, -log10 p)` and is measured against
//!    the nearer of the two observed corners `(min FC, max y)` / `(max FC, max y)`.
//! 2. **Accumulation** ([`DistanceAccumulator`]): samples are appended per
//!    compound in comparison order, then row order.
//! 3. **Aggregation** ([`aggregate_distance`]): each compound's samples collapse
//!    to one `total_distance`.
//! 4. **Filter & rank** ([`rank`]): aggregates are joined with descriptive
//!    metadata, kept when `total_distance < distance_threshold`, and truncated
//!    to `max_results` in first-appearance order.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use volcanorank::engine::{DistanceEngine, EngineConfig};
//! use volcanorank::registry::ComparisonRegistry;
//! use volcanorank::table::CompoundTable;
//!
//! let table = CompoundTable::from_path("ReSpleen.csv")?;
//! let registry = ComparisonRegistry::load("column_mapping.json")?;
//!
//! let engine = DistanceEngine::new(EngineConfig::default());
//! let output = engine.run(&table, registry.comparisons_for("ReSpleen.csv"))?;
//!
//! println!("{}", output.report);
//! for record in output.records.iter() {
//!     println!("{} {:.4}", record.compound_id, record.total_distance);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Missing descriptive columns abort the run with [`EngineError::SchemaError`].
//! Every other data problem is recorded in the [`RunReport`] and degrades the
//! result instead of stopping it.

mod accumulator;
mod aggregate;
mod corner;
mod error;
mod rank;
mod report;


use log::info;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::registry::ComparisonSpec;
use crate::table::{CompoundTable, FieldNames, NumericIssue, TableError};

pub use accumulator::DistanceAccumulator;
pub use aggregate::{
    aggregate_distance, mean, population_variance, weighted_average, AggregateResult,
};
pub use corner::{
    corner_distances, neg_log10, ComparisonDistances, ComparisonOutcome, CornerBounds,
    DistanceSample,
};
pub use error::EngineError;
pub use rank::{rank, CompoundMetadata, MetadataIndex, RankedRecord, RankedTable};
pub use report::{Diagnostic, RunReport, Severity, SkipReason};

/// Default upper bound (exclusive) on `total_distance`
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 7.5;

/// Default maximum number of output records
pub const DEFAULT_MAX_RESULTS: usize = 200;

/// Order of records before truncation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResultOrder {
    /// First-appearance order across comparisons and rows
    #[default]
    Encounter,
    /// Ascending `total_distance`, ties in first-appearance order
    AscendingDistance,
}

/// Ranking parameters
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Keep records with `total_distance` strictly below this value
    pub distance_threshold: f64,
    /// Truncate to at most this many records after filtering
    pub max_results: usize,
    /// Order applied before truncation
    pub order: ResultOrder,
    /// Descriptive column names
    pub fields: FieldNames,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            max_results: DEFAULT_MAX_RESULTS,
            order: ResultOrder::default(),
            fields: FieldNames::default(),
        }
    }
}

impl EngineConfig {
    /// Reject thresholds that are negative or not finite
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.distance_threshold.is_finite() || self.distance_threshold < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "distance_threshold must be a finite, non-negative number, got {}",
                self.distance_threshold
            )));
        }
        Ok(())
    }
}

/// Result of a ranking run
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Ranked records
    pub records: RankedTable,
    /// Counters and diagnostics
    pub report: RunReport,
}

/// Runs the full corner-distance ranking over a table
#[derive(Debug, Clone, Default)]
pub struct DistanceEngine {
    config: EngineConfig,
}

impl DistanceEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The engine's configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Rank the compounds of `table` over `comparisons`, processed in the given order.
    pub fn run(
        &self,
        table: &CompoundTable,
        comparisons: &[ComparisonSpec],
    ) -> Result<EngineOutput, EngineError> {
        self.config.validate()?;
        let fields = &self.config.fields;

        if let Err(TableError::MissingColumns(missing)) =
            table.require_columns(&fields.required())
        {
            return Err(EngineError::SchemaError(missing));
        }

        info!(
            "Ranking {} compounds over {} comparisons",
            table.len(),
            comparisons.len()
        );

        let mut report = RunReport::new();
        let accumulator = self.accumulate(table, comparisons, &mut report);
        report.samples_recorded = accumulator.sample_count();

        let aggregates = accumulator.aggregate();
        report.compounds_aggregated = aggregates.len();

        let metadata = MetadataIndex::from_table(table, fields);
        if metadata.duplicates() > 0 {
            report.push(Diagnostic::DuplicateMetadata {
                duplicates: metadata.duplicates(),
            });
        }

        let records = rank(aggregates, &metadata, &self.config, &mut report);
        report.records_emitted = records.len();
        info!(
            "{} of {} compounds passed the distance threshold of {}",
            records.len(),
            report.compounds_aggregated,
            self.config.distance_threshold
        );

        Ok(EngineOutput { records, report })
    }

    /// Measure every comparison into its own buffer, then merge the buffers in
    /// registry order.
    fn accumulate(
        &self,
        table: &CompoundTable,
        comparisons: &[ComparisonSpec],
        report: &mut RunReport,
    ) -> DistanceAccumulator {
        let fields = &self.config.fields;

        #[cfg(feature = "parallel")]
        let measured: Vec<ComparisonDistances> = comparisons
            .par_iter()
            .map(|spec| corner_distances(table, spec, fields))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let measured: Vec<ComparisonDistances> = comparisons
            .iter()
            .map(|spec| corner_distances(table, spec, fields))
            .collect();

        let mut accumulator = DistanceAccumulator::new();
        for comparison in measured {
            for (column, issue) in comparison.parse_issues {
                report.push(match issue {
                    NumericIssue::PartiallyUnparseable { failed, samples } => {
                        Diagnostic::NumericParse {
                            column,
                            failed,
                            samples,
                        }
                    }
                    NumericIssue::AllUnparseable { samples } => {
                        Diagnostic::AllValuesUnparseable { column, samples }
                    }
                });
            }

            match comparison.outcome {
                ComparisonOutcome::Skipped(reason) => report.push(Diagnostic::ComparisonSkipped {
                    title: comparison.title,
                    reason,
                }),
                ComparisonOutcome::Measured { samples, .. } => {
                    accumulator.extend(&samples);
                    report.comparisons_processed += 1;
                }
            }
        }
        accumulator
    }
}
