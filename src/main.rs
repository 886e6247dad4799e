//! # volcanorank
//!
//! A command-line tool that ranks compounds by how close their
//! differential-expression results come to the significance corners of their
//! volcano plots.
//!
//! ## Usage
//!
//! ```bash
//! # Find fold-change/p-value column pairs and save them to column_mapping.json
//! volcanorank map ReSpleen.csv
//!
//! # Rank compounds using the saved registry
//! volcanorank rank ReSpleen.csv --threshold 7.5 --max-results 200
//!
//! # Both steps at once
//! volcanorank run ReSpleen.csv -o by_distance_named.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
