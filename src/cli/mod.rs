use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

mod config;
mod map;
mod rank;

use rank::RankOptions;

/// volcanorank - rank compounds by distance to the volcano-plot significance corners
#[derive(Parser)]
#[command(name = "volcanorank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by the rank and run commands
#[derive(clap::Args)]
struct RankArgs {
    /// Comparison registry JSON file
    #[arg(short = 'm', long, value_name = "FILE", default_value = "column_mapping.json")]
    mapping: PathBuf,

    /// Registry key of the dataset (defaults to the input path as given)
    #[arg(long, value_name = "ID")]
    dataset_id: Option<String>,

    /// Output CSV file
    #[arg(short, long, value_name = "FILE", default_value = "by_distance_named.csv")]
    output: PathBuf,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Keep compounds with a total distance strictly below this value (default: 7.5)
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Maximum number of compounds to keep (default: 200)
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Sort by ascending distance before truncating instead of keeping table order
    #[arg(long)]
    sort: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract fold-change/p-value column pairs into a comparison registry
    Map {
        /// Input compound table (CSV)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Comparison registry JSON file to create or update
        #[arg(short, long, value_name = "FILE", default_value = "column_mapping.json")]
        output: PathBuf,

        /// Registry key of the dataset (defaults to the input path as given)
        #[arg(long, value_name = "ID")]
        dataset_id: Option<String>,
    },

    /// Rank compounds using a previously saved comparison registry
    Rank {
        /// Input compound table (CSV)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[command(flatten)]
        args: RankArgs,
    },

    /// Extract comparisons, then rank compounds
    Run {
        /// Input compound table (CSV)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[command(flatten)]
        args: RankArgs,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn dataset_key(input: &Path, dataset_id: Option<String>) -> String {
    dataset_id.unwrap_or_else(|| input.to_string_lossy().into_owned())
}

fn rank_options(input: PathBuf, args: RankArgs) -> RankOptions {
    RankOptions {
        dataset_id: dataset_key(&input, args.dataset_id),
        input,
        registry: args.mapping,
        output: args.output,
        config: args.config,
        threshold: args.threshold,
        max_results: args.max_results,
        sort: args.sort,
    }
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Map {
            input,
            output,
            dataset_id,
        } => {
            let key = dataset_key(&input, dataset_id);
            map::run(&input, &output, &key)
        }
        Commands::Rank { input, args } => rank::run(rank_options(input, args)),
        Commands::Run { input, args } => {
            let options = rank_options(input, args);
            map::run(&options.input, &options.registry, &options.dataset_id)?;
            rank::run(options)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_rank_command() {
        let cli = Cli::parse_from([
            "volcanorank",
            "-v",
            "rank",
            "ReSpleen.csv",
            "--threshold",
            "5",
            "-n",
            "50",
            "--sort",
        ]);
        assert_eq!(cli.verbosity(), 1);

        match cli.command {
            Commands::Rank { input, args } => {
                let options = rank_options(input, args);
                assert_eq!(options.dataset_id, "ReSpleen.csv");
                assert_eq!(options.registry, PathBuf::from("column_mapping.json"));
                assert_eq!(options.output, PathBuf::from("by_distance_named.csv"));
                assert_eq!(options.threshold, Some(5.0));
                assert_eq!(options.max_results, Some(50));
                assert!(options.sort);
            }
            _ => panic!("expected rank command"),
        }
    }

    #[test]
    fn test_explicit_dataset_id() {
        assert_eq!(dataset_key(Path::new("a/b.csv"), None), "a/b.csv");
        assert_eq!(dataset_key(Path::new("a/b.csv"), Some("b".to_string())), "b");
    }
}
