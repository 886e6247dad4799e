use std::collections::HashMap;

use super::aggregate::{aggregate_distance, AggregateResult};
use super::corner::DistanceSample;

/// Per-compound distance samples in first-appearance order.
///
/// Built fresh for every run. Samples for a compound keep the order they were
/// pushed in, and compounds iterate in the order they were first seen.
#[derive(Debug, Clone, Default)]
pub struct DistanceAccumulator {
    entries: Vec<(String, Vec<f64>)>,
    index: HashMap<String, usize>,
}

impl DistanceAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sample for a compound
    pub fn push(&mut self, compound_id: &str, distance: f64) {
        match self.index.get(compound_id) {
            Some(&slot) => self.entries[slot].1.push(distance),
            None => {
                self.index.insert(compound_id.to_string(), self.entries.len());
                self.entries.push((compound_id.to_string(), vec![distance]));
            }
        }
    }

    /// Append a comparison's samples in order
    pub fn extend<'a, I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = &'a DistanceSample>,
    {
        for sample in samples {
            self.push(&sample.compound_id, sample.distance);
        }
    }

    /// Samples recorded for a compound
    pub fn get(&self, compound_id: &str) -> Option<&[f64]> {
        self.index
            .get(compound_id)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    /// Number of compounds with at least one sample
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sample has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of samples across all compounds
    pub fn sample_count(&self) -> usize {
        self.entries.iter().map(|(_, d)| d.len()).sum()
    }

    /// Compounds and their samples in first-appearance order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.entries
            .iter()
            .map(|(id, distances)| (id.as_str(), distances.as_slice()))
    }

    /// Collapse every compound's samples into one aggregate distance
    pub fn aggregate(self) -> Vec<AggregateResult> {
        self.entries
            .into_iter()
            .filter_map(|(compound_id, distances)| {
                aggregate_distance(&distances).map(|total_distance| AggregateResult {
                    compound_id,
                    total_distance,
                })
            })
            .collect()
    }
}
