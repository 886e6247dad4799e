//! Per-comparison distance to the nearer significance corner.
//!
//! Each valid row of a comparison is a point `(x, y)` with `x` the log2 fold
//! change and `y = -log10(p)`. The reference corners are the observed extremes
//! of that comparison: `(min x, max y)` for down-regulated points (`x < 0`) and
//! `(max x, max y)` for everything else.

use log::debug;

use super::report::SkipReason;
use crate::registry::ComparisonSpec;
use crate::table::{CompoundTable, FieldNames, NumericIssue};

/// Observed extremes of one comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerBounds {
    /// Smallest fold change
    pub leftmost_x: f64,
    /// Largest fold change
    pub rightmost_x: f64,
    /// Largest `-log10(p)`
    pub topmost_y: f64,
}

impl CornerBounds {
    /// Bounds of a non-empty point set; `None` when `points` is empty
    pub fn from_points(points: &[(f64, f64)]) -> Option<Self> {
        let (&(x0, y0), rest) = points.split_first()?;
        Some(rest.iter().fold(
            CornerBounds {
                leftmost_x: x0,
                rightmost_x: x0,
                topmost_y: y0,
            },
            |b, &(x, y)| CornerBounds {
                leftmost_x: b.leftmost_x.min(x),
                rightmost_x: b.rightmost_x.max(x),
                topmost_y: b.topmost_y.max(y),
            },
        ))
    }

    /// Corner a point is measured against
    pub fn corner_for(&self, x: f64) -> (f64, f64) {
        if x < 0.0 {
            (self.leftmost_x, self.topmost_y)
        } else {
            (self.rightmost_x, self.topmost_y)
        }
    }

    /// Euclidean distance from `(x, y)` to its corner
    pub fn distance(&self, x: f64, y: f64) -> f64 {
        let (cx, cy) = self.corner_for(x);
        let dx = x - cx;
        let dy = y - cy;
        (dx * dx + dy * dy).sqrt()
    }
}

/// `-log10(p)`, or `None` for p-values that are not positive and finite
pub fn neg_log10(p_value: f64) -> Option<f64> {
    if p_value.is_finite() && p_value > 0.0 {
        Some(-p_value.log10())
    } else {
        None
    }
}

/// One compound's distance in one comparison
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceSample {
    /// Compound identifier
    pub compound_id: String,
    /// Distance to the nearer corner, never negative
    pub distance: f64,
}

/// Result of measuring a comparison
#[derive(Debug, Clone, PartialEq)]
pub enum ComparisonOutcome {
    /// The comparison contributes no samples
    Skipped(SkipReason),
    /// Samples in row order
    Measured {
        /// Reference extremes
        bounds: CornerBounds,
        /// One sample per valid row
        samples: Vec<DistanceSample>,
    },
}

/// Everything learned from one comparison, kept isolated until merged
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonDistances {
    /// Comparison title
    pub title: String,
    /// Parse problems of the comparison's numeric columns
    pub parse_issues: Vec<(String, NumericIssue)>,
    /// Samples or skip reason
    pub outcome: ComparisonOutcome,
}

/// Measure every valid row of one comparison.
///
/// A row is valid when it has a finite fold change, a positive finite p-value
/// and a compound identifier.
pub fn corner_distances(
    table: &CompoundTable,
    spec: &ComparisonSpec,
    fields: &FieldNames,
) -> ComparisonDistances {
    let fc_field = spec.fold_change_field();
    let pv_field = spec.p_value_field();
    debug!("Processing comparison: {} vs {}", fc_field, pv_field);

    let mut result = ComparisonDistances {
        title: spec.title().to_string(),
        parse_issues: Vec::new(),
        outcome: ComparisonOutcome::Skipped(SkipReason::NoValidRows),
    };

    let (fold_changes, p_values) = match (
        table.numeric_column(fc_field),
        table.numeric_column(pv_field),
    ) {
        (Some(fc), Some(pv)) => (fc, pv),
        (fc, pv) => {
            let mut missing = Vec::new();
            if fc.is_none() {
                missing.push(fc_field.to_string());
            }
            if pv.is_none() {
                missing.push(pv_field.to_string());
            }
            result.outcome = ComparisonOutcome::Skipped(SkipReason::MissingColumns(missing));
            return result;
        }
    };

    for (column, parsed) in [(pv_field, &p_values), (fc_field, &fold_changes)] {
        if let Some(issue) = &parsed.issue {
            result.parse_issues.push((column.to_string(), issue.clone()));
        }
    }

    let mut ids = Vec::new();
    let mut points = Vec::new();
    for (row, (fc, pv)) in fold_changes.values.iter().zip(&p_values.values).enumerate() {
        let x = match fc {
            Some(x) if x.is_finite() => *x,
            _ => continue,
        };
        let Some(y) = pv.and_then(neg_log10) else {
            continue;
        };
        let Some(id) = table.text(row, &fields.compound_id) else {
            continue;
        };
        ids.push(id);
        points.push((x, y));
    }

    let Some(bounds) = CornerBounds::from_points(&points) else {
        return result;
    };

    let samples = ids
        .into_iter()
        .zip(&points)
        .map(|(id, &(x, y))| DistanceSample {
            compound_id: id.to_string(),
            distance: bounds.distance(x, y),
        })
        .collect();

    result.outcome = ComparisonOutcome::Measured { bounds, samples };
    result
}
