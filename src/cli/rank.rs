use anyhow::{Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};

use volcanorank::engine::{DistanceEngine, EngineConfig, ResultOrder};
use volcanorank::registry::ComparisonRegistry;
use volcanorank::table::CompoundTable;

use super::config::Config;

/// Options of the rank command after argument parsing
#[derive(Debug)]
pub struct RankOptions {
    pub input: PathBuf,
    pub registry: PathBuf,
    pub dataset_id: String,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub threshold: Option<f64>,
    pub max_results: Option<usize>,
    pub sort: bool,
}

/// Flags override the config file, which overrides the defaults.
fn engine_config(options: &RankOptions) -> Result<EngineConfig> {
    let file = match &options.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let defaults = EngineConfig::default();
    let sort = options.sort || file.ranking.sort_by_distance.unwrap_or(false);

    Ok(EngineConfig {
        distance_threshold: options
            .threshold
            .or(file.ranking.distance_threshold)
            .unwrap_or(defaults.distance_threshold),
        max_results: options
            .max_results
            .or(file.ranking.max_results)
            .unwrap_or(defaults.max_results),
        order: if sort {
            ResultOrder::AscendingDistance
        } else {
            ResultOrder::Encounter
        },
        fields: file.fields,
    })
}

/// Rank the compounds of a table and write the result table
pub fn run(options: RankOptions) -> Result<()> {
    let config = engine_config(&options)?;

    let table = load_table(&options.input)?;
    let registry = ComparisonRegistry::load(&options.registry)
        .with_context(|| format!("Failed to read registry: {}", options.registry.display()))?;

    let comparisons = registry.comparisons_for(&options.dataset_id);
    if comparisons.is_empty() {
        warn!(
            "No comparisons registered for '{}' in {}",
            options.dataset_id,
            options.registry.display()
        );
    }

    let engine = DistanceEngine::new(config);
    let output = engine
        .run(&table, comparisons)
        .with_context(|| format!("Failed to rank compounds in {}", options.input.display()))?;

    output
        .records
        .write_csv(&options.output, &engine.config().fields)
        .with_context(|| format!("Failed to write output: {}", options.output.display()))?;

    println!("{}", output.report.format_colored());
    println!(
        "Wrote {} compounds to {}",
        output.records.len(),
        options.output.display()
    );
    Ok(())
}

fn load_table(path: &Path) -> Result<CompoundTable> {
    let table = CompoundTable::from_path(path)
        .with_context(|| format!("Failed to load compound table: {}", path.display()))?;
    info!(
        "Loaded {} rows and {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}
