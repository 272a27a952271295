//! Result file discovery for chart generation.
//!
//! Results live in one subdirectory per branch:
//!
//! ```text
//! results/
//!   master/3sx3l.Leech.time_to_fetch.average.csv
//!   mybranch/3sx3l.Leech.time_to_fetch.average.csv
//! ```
//!
//! File names encode the seed and leech counts and, depending on the layout,
//! the latency and bandwidth of the run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use color_eyre::eyre::{Context, Result};
use regex::Regex;

/// Naming scheme of a results directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartLayout {
    /// `<S>sx<L>l-<lat>ms-bw<bw>.<name>.raw` next to its leech averages
    Transfer,
    /// `<S>sx<L>l.Leech.<name>.average.csv`
    Perf,
    /// `<S>sx<L>l.Seed.<lat>.<name>.average.csv`
    PeerSelection,
}

impl fmt::Display for ChartLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartLayout::Transfer => "transfer",
            ChartLayout::Perf => "perf",
            ChartLayout::PeerSelection => "peer-selection",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ChartLayout {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "transfer" => Ok(ChartLayout::Transfer),
            "perf" => Ok(ChartLayout::Perf),
            "peer-selection" => Ok(ChartLayout::PeerSelection),
            other => Err(format!(
                "unknown chart layout '{}' (expected transfer, perf or peer-selection)",
                other
            )),
        }
    }
}

/// A plottable series found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct ResultFile {
    /// Name of the branch subdirectory
    pub branch: String,
    pub seeds: String,
    pub leeches: String,
    pub latency_ms: Option<String>,
    pub bandwidth_mb: Option<String>,
    /// Metric name as encoded in the matched file name
    pub name: String,
    /// CSV file holding the points
    pub path: PathBuf,
}

/// Compiled file name patterns, one per layout
pub struct ResultPatterns {
    pub transfer: Regex,
    pub perf: Regex,
    pub peer_selection: Regex,
}

impl ResultPatterns {
    pub fn new() -> Self {
        Self {
            transfer: Regex::new(r"^(([0-9]+)sx([0-9]+)l)-([0-9]+)ms-bw([0-9]+)\.(.+)\.raw$")
                .expect("Invalid transfer regex"),
            perf: Regex::new(r"^(([0-9]+)sx([0-9]+)l)\.Leech\.(.+)\.average\.csv$")
                .expect("Invalid perf regex"),
            peer_selection: Regex::new(r"^(([0-9]+)sx([0-9]+)l)\.Seed\.([0-9]+)\.(.+)\.average\.csv$")
                .expect("Invalid peer_selection regex"),
        }
    }
}

impl Default for ResultPatterns {
    fn default() -> Self {
        Self::new()
    }
}

pub static PATTERNS: LazyLock<ResultPatterns> = LazyLock::new(ResultPatterns::new);

/// Match one file name of `subdir` against `layout`.
///
/// For the transfer layout the series data is the companion
/// `<label>.Leech.<metric>.average.csv`, which is returned only if it exists.
pub fn match_result_file(
    layout: ChartLayout,
    subdir: &Path,
    branch: &str,
    file_name: &str,
    metric: &str,
) -> Option<ResultFile> {
    match layout {
        ChartLayout::Transfer => {
            let caps = PATTERNS.transfer.captures(file_name)?;
            let path = subdir.join(format!("{}.Leech.{}.average.csv", &caps[1], metric));
            if !path.exists() {
                log::debug!("No companion series {} (skipping)", path.display());
                return None;
            }
            Some(ResultFile {
                branch: branch.to_string(),
                seeds: caps[2].to_string(),
                leeches: caps[3].to_string(),
                latency_ms: Some(caps[4].to_string()),
                bandwidth_mb: Some(caps[5].to_string()),
                name: caps[6].to_string(),
                path,
            })
        }
        ChartLayout::Perf => {
            let caps = PATTERNS.perf.captures(file_name)?;
            Some(ResultFile {
                branch: branch.to_string(),
                seeds: caps[2].to_string(),
                leeches: caps[3].to_string(),
                latency_ms: None,
                bandwidth_mb: None,
                name: caps[4].to_string(),
                path: subdir.join(file_name),
            })
        }
        ChartLayout::PeerSelection => {
            let caps = PATTERNS.peer_selection.captures(file_name)?;
            Some(ResultFile {
                branch: branch.to_string(),
                seeds: caps[2].to_string(),
                leeches: caps[3].to_string(),
                latency_ms: Some(caps[4].to_string()),
                bandwidth_mb: None,
                name: caps[5].to_string(),
                path: subdir.join(file_name),
            })
        }
    }
}

/// Sorted names of the entries of `dir`
fn sorted_entries(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

/// Scan every branch subdirectory of `root` for files of `layout`.
///
/// Branches and files are visited in name order so repeated runs produce the
/// same series order. Plain files directly under `root` are ignored.
pub fn discover_results(root: &Path, layout: ChartLayout, metric: &str) -> Result<Vec<ResultFile>> {
    let mut results = Vec::new();

    for branch in sorted_entries(root)? {
        let subdir = root.join(&branch);
        let is_dir = fs::symlink_metadata(&subdir)
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }

        for file_name in sorted_entries(&subdir)? {
            if let Some(found) = match_result_file(layout, &subdir, &branch, &file_name, metric) {
                results.push(found);
            }
        }
    }

    log::debug!("Found {} {} result files in {}", results.len(), layout, root.display());
    Ok(results)
}
