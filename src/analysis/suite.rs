//! Suite aggregators: per-run averages of each metric across file sizes.
//!
//! Every suite groups samples by a fixed list of attributes, then within each
//! innermost group by `run` (numerically ordered) and `fileSize`. Each
//! `(run, fileSize)` bucket contributes one `(fileSize, average)` point; runs
//! are concatenated, never averaged together.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use color_eyre::eyre::Result;

use super::grouping::{group_by_attribute, sort_run_labels};
use super::log_parser::parse_lines;
use super::metrics::{extract_samples, NameLayout, RecordShape};
use super::stats::average;
use super::types::{MetricSample, Point, PointSeries};
use crate::error::SwapbenchError;
use crate::output::csv::write_points;

/// Statistic name embedded in suite output file names
pub const STAT_NAME: &str = "average";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    /// Positional V2 names, grouped by node type and metric
    Legacy,
    /// Grouped by node type and metric
    Perf,
    /// Grouped by node type, latency and metric
    PeerSelection,
    /// Grouped by test group, node type and metric
    VersionCompat,
}

impl Suite {
    pub fn shape(self) -> RecordShape {
        match self {
            Suite::Legacy => RecordShape::V2,
            _ => RecordShape::V1,
        }
    }

    pub fn layout(self) -> NameLayout {
        match self {
            Suite::Legacy => NameLayout::Positional,
            _ => NameLayout::KeyValue,
        }
    }

    /// Attributes grouped on before the run/file-size split, outermost first
    pub fn grouping_keys(self) -> &'static [&'static str] {
        match self {
            Suite::Legacy | Suite::Perf => &["nodeType", "name"],
            Suite::PeerSelection => &["nodeType", "latencyMS", "name"],
            Suite::VersionCompat => &["groupName", "nodeType", "name"],
        }
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suite::Legacy => "legacy",
            Suite::Perf => "perf",
            Suite::PeerSelection => "peer-selection",
            Suite::VersionCompat => "version-compat",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Suite {
    type Err = SwapbenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Suite::Legacy),
            "perf" => Ok(Suite::Perf),
            "peer-selection" => Ok(Suite::PeerSelection),
            "version-compat" => Ok(Suite::VersionCompat),
            other => Err(SwapbenchError::UnknownSuite(other.to_string())),
        }
    }
}

/// One point per `(run, fileSize)` bucket, runs in numeric order
pub fn run_averages(samples: &[&MetricSample]) -> Vec<Point> {
    let by_run = group_by_attribute(samples.iter().copied(), "run");
    let mut runs: Vec<String> = by_run.keys().cloned().collect();
    sort_run_labels(&mut runs);

    let mut points = Vec::new();
    for run in &runs {
        let by_file_size = group_by_attribute(by_run[run].iter().copied(), "fileSize");
        for (file_size, bucket) in by_file_size {
            let values: Vec<f64> = bucket.iter().map(|s| s.value).collect();
            if let Some(avg) = average(&values) {
                points.push(Point::new(file_size, avg));
            }
        }
    }
    points
}

/// Partition samples by the suite's grouping keys and compute the run
/// averages of every innermost group
pub fn aggregate_suite(suite: Suite, samples: &[MetricSample]) -> Vec<PointSeries> {
    let mut series = Vec::new();
    let all: Vec<&MetricSample> = samples.iter().collect();
    partition(&all, suite.grouping_keys(), &mut Vec::new(), &mut series);
    series
}

fn partition<'a>(
    samples: &[&'a MetricSample],
    keys: &[&str],
    labels: &mut Vec<String>,
    out: &mut Vec<PointSeries>,
) {
    let Some((key, rest)) = keys.split_first() else {
        out.push(PointSeries {
            labels: labels.clone(),
            points: run_averages(samples),
        });
        return;
    };

    for (label, group) in group_by_attribute(samples.iter().copied(), key) {
        labels.push(label);
        partition(&group, rest, labels, out);
        labels.pop();
    }
}

/// Output path for a series: `<base>.<label>...<label>.average.csv`
pub fn series_path(base: &str, labels: &[String]) -> PathBuf {
    let mut path = base.to_string();
    for label in labels {
        path.push('.');
        path.push_str(label);
    }
    path.push('.');
    path.push_str(STAT_NAME);
    path.push_str(".csv");
    PathBuf::from(path)
}

/// Parse raw log text, aggregate it for `suite` and write one CSV per series.
/// Files written before a failing write are left in place.
pub fn write_suite(suite: Suite, data: &str, base: &str) -> Result<Vec<PathBuf>> {
    let records = parse_lines(data);
    let samples = extract_samples(&records, suite.shape(), suite.layout())?;
    log::info!("Extracted {} {} metric samples", samples.len(), suite);

    let mut written = Vec::new();
    for series in aggregate_suite(suite, &samples) {
        let path = series_path(base, &series.labels);
        write_points(&path, &series.points)?;
        log::debug!("Wrote {} points to {}", series.points.len(), path.display());
        written.push(path);
    }

    log::info!("Wrote {} series files", written.len());
    Ok(written)
}
