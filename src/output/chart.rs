//! Chart generation: discover result series, filter them and write a
//! `.plot` script next to the results.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};

use super::discovery::{discover_results, ChartLayout, ResultFile};
use super::plot::{render_plot, series_id, PlotOptions, PlotSeries};

/// Everything the `chart` command needs
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub layout: ChartLayout,
    pub dir: PathBuf,
    pub metric: String,
    pub branch: Option<String>,
    pub bandwidth_mb: u64,
    pub latency_ms: u64,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub xscale: f64,
    pub yscale: f64,
}

fn label_equals(label: Option<&str>, expected: u64) -> bool {
    label.and_then(|l| l.parse::<u64>().ok()) == Some(expected)
}

/// Keep the series the request asks for
pub fn select_series(req: &ChartRequest, found: Vec<ResultFile>) -> Vec<ResultFile> {
    found
        .into_iter()
        .filter(|f| match req.layout {
            ChartLayout::Transfer => {
                label_equals(f.latency_ms.as_deref(), req.latency_ms)
                    && label_equals(f.bandwidth_mb.as_deref(), req.bandwidth_mb)
            }
            ChartLayout::Perf => f.name == req.metric,
            ChartLayout::PeerSelection => {
                f.name == req.metric && req.branch.as_ref().map_or(true, |b| &f.branch == b)
            }
        })
        .collect()
}

fn to_plot_series(layout: ChartLayout, file: &ResultFile) -> PlotSeries {
    let (raw_id, title) = match layout {
        ChartLayout::PeerSelection => {
            let latency = file.latency_ms.as_deref().unwrap_or_default();
            (
                format!("{}{}x{}x{}", file.branch, file.seeds, file.leeches, latency),
                format!("{}: {}ms latency", file.branch, latency),
            )
        }
        ChartLayout::Transfer | ChartLayout::Perf => (
            format!("{}{}x{}", file.branch, file.seeds, file.leeches),
            format!("{}: {} seeds / {} leeches", file.branch, file.seeds, file.leeches),
        ),
    };

    PlotSeries {
        id: series_id(&raw_id),
        branch: file.branch.clone(),
        title,
        path: file.path.clone(),
    }
}

fn plot_title(req: &ChartRequest) -> String {
    match req.layout {
        ChartLayout::PeerSelection => format!("Bitswap ({}MB bandwidth)", req.bandwidth_mb),
        ChartLayout::Transfer | ChartLayout::Perf => format!(
            "Bitswap ({}ms latency, {}MB bandwidth)",
            req.latency_ms, req.bandwidth_mb
        ),
    }
}

/// Where the script is written: `<dir>/[<branch>.]<metric>.plot`
pub fn plot_path(req: &ChartRequest) -> PathBuf {
    let file_name = match (&req.layout, &req.branch) {
        (ChartLayout::PeerSelection, Some(branch)) => format!("{}.{}.plot", branch, req.metric),
        _ => format!("{}.plot", req.metric),
    };
    req.dir.join(file_name)
}

/// Build the plot script for `req` without touching the output file
pub fn render_chart(req: &ChartRequest) -> Result<String> {
    let found = discover_results(&req.dir, req.layout, &req.metric)?;
    let selected = select_series(req, found);
    log::info!("Plotting {} series of {}", selected.len(), req.metric);

    let series: Vec<PlotSeries> = selected
        .iter()
        .map(|f| to_plot_series(req.layout, f))
        .collect();

    let opts = PlotOptions {
        title: plot_title(req),
        xlabel: req.xlabel.clone(),
        ylabel: req.ylabel.clone(),
        xscale: req.xscale,
        yscale: req.yscale,
    };
    Ok(render_plot(&opts, &series))
}

/// Render and write the plot script, returning its path
pub fn write_chart(req: &ChartRequest) -> Result<PathBuf> {
    let script = render_chart(req)?;
    let path = plot_path(req);
    write_script(&path, &script)?;
    log::info!("Plot script written to {}", path.display());
    Ok(path)
}

fn write_script(path: &Path, script: &str) -> Result<()> {
    fs::write(path, script)
        .with_context(|| format!("Failed to write plot script to {}", path.display()))
}
