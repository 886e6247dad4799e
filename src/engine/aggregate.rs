//! Cross-comparison aggregation of corner distances.
//!
//! Samples are combined with a weighted average whose weight is the same
//! scalar, `1 / variance`, for every sample. A constant weight cancels out, so
//! the aggregate equals the arithmetic mean; the zero-variance branch only
//! avoids the division by zero. Weights are never computed per sample.

use log::debug;

/// A compound's combined distance across all comparisons
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// Compound identifier
    pub compound_id: String,
    /// Combined distance, never negative
    pub total_distance: f64,
}

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divides by `n`); `None` for an empty slice
pub fn population_variance(values: &[f64]) -> Option<f64> {
    let m = mean(values)?;
    Some(values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64)
}

/// Weighted average with one weight per value
pub fn weighted_average(values: &[f64], weights: &[f64]) -> Option<f64> {
    if values.is_empty() || values.len() != weights.len() {
        return None;
    }
    let weight_sum: f64 = weights.iter().sum();
    let weighted: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Some(weighted / weight_sum)
}

/// Combine one compound's distance samples.
///
/// - one sample: returned unchanged
/// - zero variance: arithmetic mean
/// - otherwise: weighted average with the uniform weight `1 / variance`
///
/// Returns `None` only for an empty slice.
pub fn aggregate_distance(distances: &[f64]) -> Option<f64> {
    match distances {
        [] => None,
        [only] => Some(*only),
        _ => {
            let variance = population_variance(distances)?;
            let weight = 1.0 / variance;
            if variance == 0.0 || !weight.is_finite() {
                debug!("Zero variance across {} samples, using simple mean", distances.len());
                return mean(distances);
            }
            let weights = vec![weight; distances.len()];
            weighted_average(distances, &weights)
        }
    }
}
