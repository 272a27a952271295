//! Flag schemas for the chart and composition commands.
//!
//! Both commands take `-key value` style flags with multi-letter keys
//! (`-xlabel`, `-def`) as well as `--key=value`. clap only knows `-k` and
//! `--key`, so [`normalize_flags`] rewrites `-xlabel` to `--xlabel` before
//! parsing. Requiredness, defaults and value types live on the structs below.

use std::path::PathBuf;

use clap::Args;

use crate::output::{ChartLayout, ChartRequest};
use crate::testplan::GlobalParams;

/// Subcommands whose flags may be spelled `-name`
pub const SINGLE_DASH_COMMANDS: [&str; 2] = ["chart", "gentomls"];

/// Subcommands that only take `--flags` and positionals
const PLAIN_COMMANDS: [&str; 3] = ["aggregate", "suite", "table"];

fn is_single_dash_long(arg: &str) -> bool {
    let Some(name) = arg.strip_prefix('-') else {
        return false;
    };
    let mut chars = name.chars();
    name.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Rewrite single-dash multi-letter flags to their double-dash form.
///
/// The first subcommand name in `args` decides: only tokens after a
/// [`SINGLE_DASH_COMMANDS`] subcommand are touched, and only those shaped
/// like `-name` (a letter, then letters, digits or `_`). Other subcommands'
/// arguments, negative numbers and `-` stay as they are.
pub fn normalize_flags<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    // None until a subcommand is seen, then whether it takes -name flags
    let mut rewrite: Option<bool> = None;
    args.into_iter()
        .map(|arg| {
            let arg: String = arg.into();
            let Some(active) = rewrite else {
                if SINGLE_DASH_COMMANDS.contains(&arg.as_str()) {
                    rewrite = Some(true);
                } else if PLAIN_COMMANDS.contains(&arg.as_str()) {
                    rewrite = Some(false);
                }
                return arg;
            };
            if active && is_single_dash_long(&arg) {
                format!("-{}", arg)
            } else {
                arg
            }
        })
        .collect()
}

/// Flags of the `chart` command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct ChartArgs {
    /// Results directory with one subdirectory per branch
    #[arg(short = 'd', long = "d", value_name = "DIR")]
    pub d: PathBuf,

    /// Metric to plot (e.g. time_to_fetch)
    #[arg(short = 'm', long = "m", value_name = "METRIC")]
    pub m: String,

    /// Only plot this branch (peer-selection layout)
    #[arg(long)]
    pub branch: Option<String>,

    /// Bandwidth in MB
    #[arg(short = 'b', long = "b", default_value_t = 1024)]
    pub b: u64,

    /// Latency in ms
    #[arg(short = 'l', long = "l", default_value_t = 5)]
    pub l: u64,

    /// X axis label
    #[arg(long)]
    pub xlabel: Option<String>,

    /// Y axis label
    #[arg(long)]
    pub ylabel: Option<String>,

    /// Factor applied to the x column
    #[arg(long, default_value_t = 1.0)]
    pub xscale: f64,

    /// Factor applied to the y column
    #[arg(long, default_value_t = 1.0)]
    pub yscale: f64,

    /// Naming scheme of the result files
    #[arg(long, default_value = "perf")]
    pub layout: ChartLayout,
}

impl ChartArgs {
    pub fn to_request(&self) -> ChartRequest {
        ChartRequest {
            layout: self.layout,
            dir: self.d.clone(),
            metric: self.m.clone(),
            branch: self.branch.clone(),
            bandwidth_mb: self.b,
            latency_ms: self.l,
            xlabel: self.xlabel.clone(),
            ylabel: self.ylabel.clone(),
            xscale: self.xscale,
            yscale: self.yscale,
        }
    }
}

/// Flags of the `gentomls` command
#[derive(Args, Debug, Clone, PartialEq)]
pub struct GenTomlsArgs {
    /// Test plan definition (YAML or JSON)
    #[arg(long = "def", value_name = "PATH")]
    pub def: PathBuf,

    /// Output directory for the compositions
    #[arg(short = 'o', long = "o", value_name = "DIR")]
    pub o: PathBuf,

    #[arg(long)]
    pub latency_ms: Option<String>,

    #[arg(long)]
    pub bandwidth_mb: Option<String>,

    #[arg(long)]
    pub file_size: Option<String>,

    #[arg(long)]
    pub seed_fraction: Option<String>,

    #[arg(long)]
    pub run_count: Option<String>,
}

impl GenTomlsArgs {
    /// Defaults overridden by whichever parameter flags were given
    pub fn global_params(&self) -> GlobalParams {
        let mut params = GlobalParams::default();
        let overrides = [
            ("latency_ms", &self.latency_ms),
            ("bandwidth_mb", &self.bandwidth_mb),
            ("file_size", &self.file_size),
            ("seed_fraction", &self.seed_fraction),
            ("run_count", &self.run_count),
        ];
        for (key, value) in overrides {
            if let Some(value) = value {
                params.set(key, value);
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct ChartCli {
        #[command(flatten)]
        chart: ChartArgs,
    }

    #[derive(Parser, Debug)]
    struct GenCli {
        #[command(flatten)]
        gen: GenTomlsArgs,
    }

    fn parse_chart(args: &[&str]) -> ChartArgs {
        let argv = normalize_flags(std::iter::once("chart").chain(args.iter().copied()));
        ChartCli::parse_from(argv).chart
    }

    #[test]
    fn test_normalize_flags() {
        let out = normalize_flags(["chart", "-xlabel", "File size", "-d", "--b=5", "-", "-1e-9", "-x_scale2", "-m"]);
        assert_eq!(out, vec!["chart", "--xlabel", "File size", "-d", "--b=5", "-", "-1e-9", "--x_scale2", "-m"]);
    }

    #[test]
    fn test_normalize_flags_leaves_other_commands_alone() {
        let out = normalize_flags(["swapbench", "-log", "suite", "perf", "-out"]);
        assert_eq!(out, vec!["swapbench", "-log", "suite", "perf", "-out"]);

        // a positional that happens to be named like a subcommand
        let out = normalize_flags(["swapbench", "suite", "perf", "chart", "-xlabel"]);
        assert_eq!(out, vec!["swapbench", "suite", "perf", "chart", "-xlabel"]);

        let out = normalize_flags(["swapbench", "gentomls", "-def", "d.yaml", "-o", "out"]);
        assert_eq!(out, vec!["swapbench", "gentomls", "--def", "d.yaml", "-o", "out"]);
    }

    #[test]
    fn test_chart_defaults() {
        let args = parse_chart(&["-d", "./results", "-m", "foo"]);
        assert_eq!(args.d, PathBuf::from("./results"));
        assert_eq!(args.m, "foo");
        assert_eq!(args.b, 1024);
        assert_eq!(args.l, 5);
        assert_eq!(args.xscale, 1.0);
        assert_eq!(args.yscale, 1.0);
        assert_eq!(args.branch, None);
        assert_eq!(args.layout, ChartLayout::Perf);
    }

    #[test]
    fn test_chart_mixed_flag_styles() {
        let args = parse_chart(&[
            "-d", "./results/bw1024MB-3x3",
            "-m", "time_to_fetch",
            "--b=512",
            "-xlabel", "File size (MB)",
            "-yscale", "1e-9",
            "-branch", "master",
            "--layout=peer-selection",
        ]);
        assert_eq!(args.b, 512);
        assert_eq!(args.xlabel.as_deref(), Some("File size (MB)"));
        assert_eq!(args.yscale, 1e-9);
        assert_eq!(args.branch.as_deref(), Some("master"));

        let req = args.to_request();
        assert_eq!(req.layout, ChartLayout::PeerSelection);
        assert_eq!(req.bandwidth_mb, 512);
        assert_eq!(req.metric, "time_to_fetch");
    }

    #[test]
    fn test_chart_requires_dir_and_metric() {
        let argv = normalize_flags(["chart", "-m", "foo"]);
        assert!(ChartCli::try_parse_from(argv).is_err());
        let argv = normalize_flags(["chart", "-d", "results"]);
        assert!(ChartCli::try_parse_from(argv).is_err());
    }

    #[test]
    fn test_gentomls_flags() {
        let argv = normalize_flags([
            "gentomls", "-def", "./defs/one-leech-two-seeds.yaml", "-o", "/tmp/gentoml",
            "--latency_ms=100", "--seed_fraction=2/3",
        ]);
        let args = GenCli::parse_from(argv).gen;
        assert_eq!(args.def, PathBuf::from("./defs/one-leech-two-seeds.yaml"));
        assert_eq!(args.o, PathBuf::from("/tmp/gentoml"));

        let params = args.global_params();
        assert_eq!(params.0["latency_ms"], "100");
        assert_eq!(params.0["seed_fraction"], "2/3");
        assert_eq!(params.0["run_count"], "1");
    }
}
