//! Command-line entry point for benchmark result tooling.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use env_logger::Env;
use log::info;

use swapbench::analysis::{self, Suite};
use swapbench::output;
use swapbench::testplan;
use swapbench::utils::{normalize_flags, ChartArgs, GenTomlsArgs};

/// Aggregation, charting and test-plan tooling for transfer benchmarks
#[derive(Parser, Debug)]
#[command(name = "swapbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Summarize a run log per instance role and print JSON
    Aggregate {
        /// Newline-delimited JSON log file
        logfile: PathBuf,
    },

    /// Read a metric log on stdin and write per-run average CSV series
    Suite {
        /// legacy, perf, peer-selection or version-compat
        suite: Suite,

        /// Output path prefix for the CSV files
        basepath: String,
    },

    /// Write a gnuplot script for the series found in a results directory
    Chart(ChartArgs),

    /// Read summary JSON on stdin and print it as a table
    Table,

    /// Generate one TOML composition per suite of a test-plan definition
    Gentomls(GenTomlsArgs),
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse_from(normalize_flags(std::env::args()));

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    match cli.command {
        Commands::Aggregate { logfile } => {
            info!("Aggregating {}", logfile.display());
            let records = analysis::parse_log_file(&logfile)?;
            let summary = analysis::aggregate_records(&records)?;
            let json = serde_json::to_string_pretty(&summary)
                .context("Failed to serialize summary to JSON")?;
            println!("{}", json);
        }
        Commands::Suite { suite, basepath } => {
            let data = analysis::read_stdin()?;
            analysis::write_suite(suite, &data, &basepath)?;
        }
        Commands::Chart(args) => {
            output::write_chart(&args.to_request())?;
        }
        Commands::Table => {
            let data = analysis::read_stdin()?;
            println!("{}", output::render_summary_table(&data)?);
        }
        Commands::Gentomls(args) => {
            let definition = testplan::load_definition(&args.def)?;
            let written = testplan::write_compositions(&definition, &args.global_params(), &args.o)?;
            info!("Generated {} compositions in {}", written.len(), args.o.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(normalize_flags(args.iter().copied()))
    }

    #[test]
    fn test_aggregate_parsing() {
        let cli = parse(&["swapbench", "aggregate", "run.out"]);
        assert_eq!(cli.log_level, "info");
        match cli.command {
            Commands::Aggregate { logfile } => assert_eq!(logfile, PathBuf::from("run.out")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_requires_logfile() {
        assert!(Cli::try_parse_from(["swapbench", "aggregate"]).is_err());
    }

    #[test]
    fn test_suite_parsing() {
        let cli = parse(&["swapbench", "--log-level", "debug", "suite", "peer-selection", "out/3sx3l"]);
        assert_eq!(cli.log_level, "debug");
        match cli.command {
            Commands::Suite { suite, basepath } => {
                assert_eq!(suite, Suite::PeerSelection);
                assert_eq!(basepath, "out/3sx3l");
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(Cli::try_parse_from(["swapbench", "suite", "nope", "out"]).is_err());
    }

    #[test]
    fn test_chart_parsing() {
        let cli = parse(&["swapbench", "chart", "-d", "./results", "-m", "foo", "-xlabel", "File size"]);
        match cli.command {
            Commands::Chart(args) => {
                assert_eq!(args.b, 1024);
                assert_eq!(args.xlabel.as_deref(), Some("File size"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_gentomls_parsing() {
        let cli = parse(&["swapbench", "gentomls", "-def", "def.yaml", "-o", "out", "--run_count=3"]);
        match cli.command {
            Commands::Gentomls(args) => assert_eq!(args.run_count.as_deref(), Some("3")),
            other => panic!("unexpected command {:?}", other),
        }
    }
}
