use std::fmt;

use log::{info, warn};

#[cfg(feature = "colorized_output")]
use console::style;

/// Why a comparison contributed no distance samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The fold-change and/or p-value column is absent
    MissingColumns(Vec<String>),
    /// No row had a usable fold change, p-value and compound identifier
    NoValidRows,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingColumns(columns) => {
                write!(f, "missing column(s): {}", columns.join(", "))
            }
            SkipReason::NoValidRows => write!(f, "no valid data"),
        }
    }
}

/// How much attention a diagnostic deserves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Expected outcome worth mentioning
    Info,
    /// Data-quality problem that degraded the result
    Warning,
}

/// Recoverable condition observed during a ranking run
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A comparison contributed no samples
    ComparisonSkipped {
        /// Comparison title
        title: String,
        /// Why it was skipped
        reason: SkipReason,
    },
    /// Some values of a numeric column failed to parse
    NumericParse {
        /// Column name
        column: String,
        /// Number of failed cells
        failed: usize,
        /// Distinct offending values
        samples: Vec<String>,
    },
    /// Every value of a numeric column failed to parse
    AllValuesUnparseable {
        /// Column name
        column: String,
        /// Distinct offending values
        samples: Vec<String>,
    },
    /// Compounds with distances but no descriptive metadata row
    MetadataJoinGap {
        /// Number of dropped compounds
        missing: usize,
    },
    /// Metadata rows ignored because an earlier row had the same identifier
    DuplicateMetadata {
        /// Number of ignored rows
        duplicates: usize,
    },
    /// Output records whose name is still empty after all fallbacks
    UnresolvedNames {
        /// Affected compound identifiers
        compound_ids: Vec<String>,
    },
    /// No compound passed the distance threshold
    EmptyResultSet,
}

impl Diagnostic {
    /// Severity of this diagnostic
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::MetadataJoinGap { .. }
            | Diagnostic::DuplicateMetadata { .. }
            | Diagnostic::EmptyResultSet => Severity::Info,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ComparisonSkipped { title, reason } => {
                write!(f, "Skipped comparison '{}': {}", title, reason)
            }
            Diagnostic::NumericParse {
                column,
                failed,
                samples,
            } => write!(
                f,
                "{} non-numeric entries in column '{}' (sample values: {:?})",
                failed, column, samples
            ),
            Diagnostic::AllValuesUnparseable { column, samples } => write!(
                f,
                "ALL VALUES in column '{}' failed numeric conversion (sample values: {:?})",
                column, samples
            ),
            Diagnostic::MetadataJoinGap { missing } => write!(
                f,
                "{} compounds in distance results not found in metadata",
                missing
            ),
            Diagnostic::DuplicateMetadata { duplicates } => write!(
                f,
                "{} metadata rows ignored for repeating an earlier compound ID",
                duplicates
            ),
            Diagnostic::UnresolvedNames { compound_ids } => write!(
                f,
                "{} entries with unresolved names after all fallbacks: {}",
                compound_ids.len(),
                compound_ids.join(", ")
            ),
            Diagnostic::EmptyResultSet => {
                write!(f, "No compounds passed the distance threshold filter")
            }
        }
    }
}

/// Summary of a ranking run: counters plus every diagnostic, in order
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Diagnostics in the order they were raised
    pub diagnostics: Vec<Diagnostic>,
    /// Comparisons that contributed at least one sample
    pub comparisons_processed: usize,
    /// Comparisons that contributed nothing
    pub comparisons_skipped: usize,
    /// Distance samples recorded across all comparisons
    pub samples_recorded: usize,
    /// Compounds with an aggregate distance
    pub compounds_aggregated: usize,
    /// Records in the final table
    pub records_emitted: usize,
}

impl RunReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Info => info!("{}", diagnostic),
            Severity::Warning => warn!("{}", diagnostic),
        }
        if matches!(diagnostic, Diagnostic::ComparisonSkipped { .. }) {
            self.comparisons_skipped += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Whether any warning-level diagnostic was raised
    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Number of warning-level diagnostics
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == Severity::Warning)
            .count()
    }

    /// Skipped comparison titles, in processing order
    pub fn skipped_comparisons(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|d| match d {
                Diagnostic::ComparisonSkipped { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Compound Ranking Report").bold().cyan()));
            output.push_str(&format!("{}\n", style("=======================").cyan()));

            for diagnostic in &self.diagnostics {
                let line = diagnostic.to_string();
                match diagnostic.severity() {
                    Severity::Info => {
                        output.push_str(&format!("[{}] {}\n", style("INFO").blue().bold(), line))
                    }
                    Severity::Warning => output.push_str(&format!(
                        "[{}] {}\n",
                        style("WARN").yellow().bold(),
                        style(line).yellow()
                    )),
                }
            }

            output.push('\n');
            output.push_str(&format!(
                "{}: {} comparisons processed, {} skipped, {} samples, {} compounds, {} records\n",
                style("Summary").bold(),
                style(self.comparisons_processed).green(),
                style(self.comparisons_skipped).yellow(),
                self.samples_recorded,
                self.compounds_aggregated,
                style(self.records_emitted).green().bold()
            ));

            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Compound Ranking Report")?;
        writeln!(f, "=======================")?;

        for diagnostic in &self.diagnostics {
            let tag = match diagnostic.severity() {
                Severity::Info => "INFO",
                Severity::Warning => "WARN",
            };
            writeln!(f, "[{}] {}", tag, diagnostic)?;
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} comparisons processed, {} skipped, {} samples, {} compounds, {} records",
            self.comparisons_processed,
            self.comparisons_skipped,
            self.samples_recorded,
            self.compounds_aggregated,
            self.records_emitted
        )
    }
}
