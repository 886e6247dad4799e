//! Derive comparison descriptors from compound table headers.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;

use super::{clean_key, ComparisonSpec, RegistryError};
use crate::table::CompoundTable;

const ADJUSTED_PREFIX: &str = "Adj. ";

fn fold_change_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"Log2 Fold Change: (.+)").expect("valid regex"))
}

fn p_value_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"P-value: (.+)").expect("valid regex"))
}

/// Comparison key of a fold-change header such as `Log2 Fold Change: (A) / (B)`
pub fn fold_change_key(header: &str) -> Option<String> {
    fold_change_pattern()
        .captures(header)
        .map(|caps| clean_key(&caps[1]))
}

/// Comparison key of a raw p-value header such as `P-value: (A) / (B)`.
///
/// Adjusted p-values (`Adj. P-value: ...`) are not matched.
pub fn p_value_key(header: &str) -> Option<String> {
    p_value_matches(header).next()
}

fn p_value_matches(header: &str) -> impl Iterator<Item = String> + '_ {
    // The regex crate has no look-behind, so the adjusted prefix is checked by hand.
    p_value_pattern()
        .captures_iter(header)
        .filter(move |caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            !header[..start].ends_with(ADJUSTED_PREFIX)
        })
        .map(|caps| clean_key(&caps[1]))
}

/// Pair fold-change and p-value headers that share a comparison key.
///
/// Specs are ordered by the position of their fold-change header. When several
/// headers map to the same key the last one wins.
pub fn extract_comparisons<S: AsRef<str>>(headers: &[S]) -> Vec<ComparisonSpec> {
    let mut fold_changes: Vec<(String, String)> = Vec::new();
    let mut p_values: HashMap<String, String> = HashMap::new();

    for header in headers {
        let header = header.as_ref();
        if let Some(key) = fold_change_key(header) {
            let column = header.trim().to_string();
            match fold_changes.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = column,
                None => fold_changes.push((key, column)),
            }
        }
        if let Some(key) = p_value_key(header) {
            p_values.insert(key, header.trim().to_string());
        }
    }

    let specs: Vec<ComparisonSpec> = fold_changes
        .into_iter()
        .filter_map(|(key, fc)| {
            let pv = p_values.get(&key)?;
            Some(ComparisonSpec::new(fc, pv.clone(), format!("Volcano Plot: {}", key)).cleaned())
        })
        .collect();

    debug!("Extracted {} comparisons from {} headers", specs.len(), headers.len());
    specs
}

/// Load a compound table and extract the comparisons named in its header
pub fn extract_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ComparisonSpec>, RegistryError> {
    let table = CompoundTable::from_path(path)?;
    Ok(extract_comparisons(table.columns()))
}
