//! # volcanorank - Significance-Corner Ranking for Differential Expression
//!
//! `volcanorank` takes per-compound differential-expression results (log2 fold
//! change and p-value for one or more pairwise comparisons) and produces a
//! single filtered list of the compounds that sit closest to the extreme
//! corners of their volcano plots, i.e. the most strongly and most confidently
//! changed compounds.
//!
//! ## Key Features
//!
//! - **Empirical corners**: Each comparison is measured against its own observed
//!   extremes, so no theoretical maximum fold change or significance is assumed.
//!
//! - **Cross-comparison aggregation**: A compound's distances from every
//!   comparison it was measured in are combined into one score.
//!
//! - **Forgiving ingestion**: Quote-polluted headers, ISO-8859-1 exports and
//!   unparseable numbers degrade the result with a warning instead of aborting.
//!
//! - **Reproducible output**: Identical inputs always give byte-identical output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use volcanorank::prelude::*;
//!
//! let table = CompoundTable::from_path("ReSpleen.csv")?;
//! let comparisons = extract_comparisons(table.columns());
//!
//! let config = EngineConfig {
//!     distance_threshold: 5.0,
//!     ..Default::default()
//! };
//! let output = DistanceEngine::new(config).run(&table, &comparisons)?;
//!
//! output.records.write_csv("by_distance_named.csv", &FieldNames::default())?;
//! println!("{}", output.report);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`table`]: Compound table loading and text normalization
//! - [`registry`]: Comparison descriptors, header extraction and JSON persistence
//! - [`engine`]: Corner distances, aggregation, filtering and the run report
//! - [`output`]: Delimited-text output of the ranked table
//!
//! ## Input Format
//!
//! | Column | Required | Description |
//! |--------|----------|-------------|
//! | Compounds ID | Yes | Unique compound identifier |
//! | Name | Yes | Display name, may be empty |
//! | Formula | Yes | Molecular formula, name fallback |
//! | Calc. MW | Yes | Calculated molecular weight, second name fallback |
//! | Log2 Fold Change: *key* | Per comparison | Log2 fold change |
//! | P-value: *key* | Per comparison | Unadjusted p-value |

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod engine;
pub mod output;
pub mod registry;
pub mod table;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::engine::{
        DistanceEngine, EngineConfig, EngineError, EngineOutput, RankedRecord, RankedTable,
        ResultOrder, RunReport,
    };
    pub use crate::output::OutputError;
    pub use crate::registry::{extract_comparisons, ComparisonRegistry, ComparisonSpec};
    pub use crate::table::{CompoundTable, FieldNames};
}
