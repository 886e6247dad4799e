use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;

use volcanorank::registry::{extract_from_path, ComparisonRegistry};

/// Extract comparisons from the table header and store them in the registry file.
///
/// An existing registry is updated in place; other datasets are kept.
pub fn run(input: &Path, registry_path: &Path, dataset_id: &str) -> Result<()> {
    let comparisons = extract_from_path(input)
        .with_context(|| format!("Failed to read table header: {}", input.display()))?;
    if comparisons.is_empty() {
        warn!("No fold-change/p-value column pairs found in {}", input.display());
    }
    for spec in &comparisons {
        info!(
            "Fold Change: {}, P-value: {}",
            spec.fold_change_field(),
            spec.p_value_field()
        );
    }

    let mut registry = if registry_path.exists() {
        ComparisonRegistry::load(registry_path)
            .with_context(|| format!("Failed to read registry: {}", registry_path.display()))?
    } else {
        ComparisonRegistry::new()
    };

    let count = comparisons.len();
    registry.insert(dataset_id, comparisons);
    registry
        .save(registry_path)
        .with_context(|| format!("Failed to write registry: {}", registry_path.display()))?;

    println!(
        "Saved {} comparisons for '{}' to {}",
        count,
        dataset_id,
        registry_path.display()
    );
    Ok(())
}
