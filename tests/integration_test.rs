//! Integration tests for volcanorank
//!
//! These tests drive the full pipeline from a CSV export on disk to the ranked
//! output file.

use std::fs;

use tempfile::tempdir;
use volcanorank::engine::{Diagnostic, DistanceEngine, EngineConfig};
use volcanorank::registry::{extract_comparisons, ComparisonRegistry};
use volcanorank::table::{CompoundTable, FieldNames};

const EXPORT: &str = "\"Compounds ID\",\"Name\",\"Formula\",\"Calc. MW\",\"m/z\",\
\"Log2 Fold Change: (KO) / (WT)\",\"P-value: (KO) / (WT)\",\"Adj. P-value: (KO) / (WT)\",\
\"Log2 Fold Change: (Het) / (WT)\",\"P-value: (Het) / (WT)\",\"Adj. P-value: (Het) / (WT)\"
C1,\"Glucose\",C6H12O6,180.06,181.07,-1.0,0.01,0.02,-0.5,0.1,0.2
C2,\"\",C5H5N5,135.05,136.06,2.0,0.02,0.04,1.5,0.005,0.01
C3,\"'Lactate'\",C3H6O3,90.03,91.04,0.2,0.9,0.95,,,
";

/// Test the complete map-then-rank cycle through files
#[test]
fn test_map_rank_write_cycle() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("export.csv");
    let registry_path = dir.path().join("column_mapping.json");
    let output_path = dir.path().join("by_distance_named.csv");
    fs::write(&input, EXPORT).unwrap();

    // Build and persist the registry
    let table = CompoundTable::from_path(&input).unwrap();
    let mut registry = ComparisonRegistry::new();
    registry.insert("export.csv", extract_comparisons(table.columns()));
    registry.save(&registry_path).unwrap();

    let registry = ComparisonRegistry::load(&registry_path).unwrap();
    let comparisons = registry.comparisons_for("export.csv");
    assert_eq!(comparisons.len(), 2);
    assert_eq!(comparisons[0].p_value_field(), "P-value: (KO) / (WT)");

    // Rank
    let output = DistanceEngine::default().run(&table, comparisons).unwrap();
    let ids: Vec<&str> = output
        .records
        .iter()
        .map(|r| r.compound_id.as_str())
        .collect();
    assert_eq!(ids, vec!["C1", "C2", "C3"]);

    let c2 = &output.records.records[1];
    assert_eq!(c2.name.as_deref(), Some("C5H5N5"));
    assert!((c2.total_distance - 2f64.log10() / 2.0).abs() < 1e-9);
    assert_eq!(output.records.records[2].name.as_deref(), Some("Lactate"));

    // Write and re-read
    output
        .records
        .write_csv(&output_path, &FieldNames::default())
        .unwrap();
    let written = CompoundTable::from_path(&output_path).unwrap();
    assert_eq!(
        written.columns(),
        &["Compounds ID", "Calc. MW", "Name", "Total Distance"]
    );
    assert_eq!(written.len(), 3);
    assert_eq!(written.text(0, "Name"), Some("Glucose"));
}

/// Identical inputs produce byte-identical output files
#[test]
fn test_output_is_byte_identical_across_runs() {
    let dir = tempdir().unwrap();
    let table = CompoundTable::from_reader(EXPORT.as_bytes()).unwrap();
    let comparisons = extract_comparisons(table.columns());

    let mut files = Vec::new();
    for i in 0..2 {
        let path = dir.path().join(format!("run{}.csv", i));
        DistanceEngine::default()
            .run(&table, &comparisons)
            .unwrap()
            .records
            .write_csv(&path, &FieldNames::default())
            .unwrap();
        files.push(fs::read(&path).unwrap());
    }
    assert_eq!(files[0], files[1]);
}

/// An empty result still yields a well-formed output file
#[test]
fn test_empty_result_writes_header_only() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    let table = CompoundTable::from_reader(EXPORT.as_bytes()).unwrap();
    let comparisons = extract_comparisons(table.columns());

    let engine = DistanceEngine::new(EngineConfig {
        distance_threshold: 0.0,
        ..Default::default()
    });
    let output = engine.run(&table, &comparisons).unwrap();
    assert!(output.records.is_empty());
    assert!(output.report.diagnostics.contains(&Diagnostic::EmptyResultSet));

    output
        .records
        .write_csv(&path, &FieldNames::default())
        .unwrap();
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Compounds ID,Calc. MW,Name,Total Distance\n"
    );
}

/// Custom column names flow through ranking and output
#[test]
fn test_custom_field_names() {
    let data = "ID,Label,Sum Formula,MW,Log2 Fold Change: X,P-value: X\n\
                a,Alpha,C1,10,1.0,0.01\n\
                b,,C2,20,-1.0,0.01\n";
    let table = CompoundTable::from_reader(data.as_bytes()).unwrap();
    let fields = FieldNames {
        compound_id: "ID".to_string(),
        name: "Label".to_string(),
        formula: "Sum Formula".to_string(),
        molecular_weight: "MW".to_string(),
    };

    let engine = DistanceEngine::new(EngineConfig {
        fields: fields.clone(),
        ..Default::default()
    });
    let output = engine
        .run(&table, &extract_comparisons(table.columns()))
        .unwrap();

    let names: Vec<Option<&str>> = output.records.iter().map(|r| r.name.as_deref()).collect();
    assert_eq!(names, vec![Some("Alpha"), Some("C2")]);

    let mut buf = Vec::new();
    output.records.write_to(&mut buf, &fields).unwrap();
    assert!(String::from_utf8(buf)
        .unwrap()
        .starts_with("ID,MW,Label,Total Distance\n"));
}

// ============================================================================
// Property-Based Tests
// ============================================================================

mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use volcanorank::engine::{aggregate_distance, mean, DistanceAccumulator};
    use volcanorank::registry::ComparisonSpec;

    fn table_from(rows: &[(f64, f64, f64, f64)]) -> CompoundTable {
        let columns = ["Compounds ID", "Name", "Formula", "Calc. MW", "FC: a", "PV: a", "FC: b", "PV: b"]
            .iter()
            .map(|c| c.to_string())
            .collect();
        let cells = rows
            .iter()
            .enumerate()
            .map(|(i, (fc1, p1, fc2, p2))| {
                vec![
                    Some(format!("C{}", i)),
                    Some(format!("Compound {}", i)),
                    None,
                    None,
                    Some(fc1.to_string()),
                    Some(p1.to_string()),
                    Some(fc2.to_string()),
                    Some(p2.to_string()),
                ]
            })
            .collect();
        CompoundTable::new(columns, cells).unwrap()
    }

    fn specs() -> Vec<ComparisonSpec> {
        vec![
            ComparisonSpec::new("FC: a", "PV: a", "a"),
            ComparisonSpec::new("FC: b", "PV: b", "b"),
        ]
    }

    fn row() -> impl Strategy<Value = (f64, f64, f64, f64)> {
        (-10.0f64..10.0, 1e-12f64..1.0, -10.0f64..10.0, 1e-12f64..1.0)
    }

    proptest! {
        /// Every recorded distance is non-negative
        #[test]
        fn test_distances_non_negative(rows in prop::collection::vec(row(), 1..40)) {
            let table = table_from(&rows);
            let fields = FieldNames::default();
            let mut acc = DistanceAccumulator::new();
            for spec in specs() {
                if let volcanorank::engine::ComparisonOutcome::Measured { samples, .. } =
                    volcanorank::engine::corner_distances(&table, &spec, &fields).outcome
                {
                    acc.extend(&samples);
                }
            }
            prop_assert_eq!(acc.len(), rows.len());
            for (_, distances) in acc.iter() {
                prop_assert_eq!(distances.len(), 2);
                prop_assert!(distances.iter().all(|d| *d >= 0.0));
            }
        }

        /// Multi-sample aggregates equal the arithmetic mean whatever the variance
        #[test]
        fn test_aggregate_is_mean(samples in prop::collection::vec(0.0f64..100.0, 2..20)) {
            let total = aggregate_distance(&samples).unwrap();
            let expected = mean(&samples).unwrap();
            prop_assert!((total - expected).abs() <= 1e-9 * expected.max(1.0));
        }

        /// Output honours the threshold and the size limit, in encounter order
        #[test]
        fn test_filter_and_truncation_invariants(
            rows in prop::collection::vec(row(), 1..60),
            threshold in 0.0f64..8.0,
            max_results in 0usize..30,
        ) {
            let table = table_from(&rows);
            let engine = DistanceEngine::new(EngineConfig {
                distance_threshold: threshold,
                max_results,
                ..Default::default()
            });
            let output = engine.run(&table, &specs()).unwrap();

            prop_assert!(output.records.len() <= max_results);
            prop_assert!(output.records.iter().all(|r| r.total_distance < threshold));

            let positions: Vec<usize> = output
                .records
                .iter()
                .map(|r| r.compound_id[1..].parse::<usize>().unwrap())
                .collect();
            prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
