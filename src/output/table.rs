//! Fixed-width text table of a role summary.
//!
//! One block per role with at least one instance: a header row naming the role
//! and its stat columns, one row per metric, and a blank separator line.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use color_eyre::eyre::{Context, Result};

use super::format_number;

/// Spaces added to every column's widest cell
pub const PADDING: usize = 3;

/// Metric whose stat values are nanosecond durations
pub const TIME_TO_FETCH: &str = "time_to_fetch";

pub type Table = Vec<Vec<String>>;

#[derive(Debug, Clone, Deserialize)]
pub struct TableMetric {
    pub stats: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableRole {
    pub count: usize,
    #[serde(default)]
    pub metrics: IndexMap<String, TableMetric>,
}

/// Summary JSON as read back for tabulation; roles keep file order
pub type TableInput = IndexMap<String, TableRole>;

fn render_value(value: &Value) -> String {
    match value {
        Value::Number(n) => n.as_f64().map(format_number).unwrap_or_else(|| n.to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Cell text for one statistic. `time_to_fetch` values are converted from
/// nanoseconds to seconds with two decimals and an `s` suffix.
pub fn render_stat(metric: &str, value: &Value) -> String {
    if metric == TIME_TO_FETCH {
        if let Some(ns) = value.as_f64() {
            let seconds = (ns / 1e9 * 100.0).round() / 100.0;
            return format!("{}s", format_number(seconds));
        }
    }
    render_value(value)
}

pub fn create_table(input: &TableInput) -> Table {
    let mut table = Vec::new();

    for (role, stats) in input.iter().filter(|(_, s)| s.count > 0) {
        let stat_names: Vec<&String> = match stats.metrics.values().next() {
            Some(first) => {
                let mut names: Vec<&String> = first.stats.keys().collect();
                names.sort();
                names
            }
            None => Vec::new(),
        };

        let mut header = vec![format!("{} ({})", role, stats.count)];
        header.extend(stat_names.iter().map(|s| s.to_string()));
        table.push(header);

        let mut metric_names: Vec<&String> = stats.metrics.keys().collect();
        metric_names.sort();
        for metric in metric_names {
            let mut row = vec![metric.clone()];
            for stat in &stat_names {
                let cell = stats.metrics[metric]
                    .stats
                    .get(stat.as_str())
                    .map(|v| render_stat(metric, v))
                    .unwrap_or_default();
                row.push(cell);
            }
            table.push(row);
        }

        table.push(Vec::new());
    }
    table
}

/// Lay out `table`: every column as wide as its widest cell plus
/// [`PADDING`]; the first column left-justified, the rest right-justified.
pub fn table_to_string(table: &Table) -> String {
    let mut widths: Vec<usize> = Vec::new();
    for row in table {
        for (c, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            if c >= widths.len() {
                widths.push(width);
            } else if widths[c] < width {
                widths[c] = width;
            }
        }
    }

    let lines: Vec<String> = table
        .iter()
        .map(|row| {
            let mut line = String::new();
            for (c, cell) in row.iter().enumerate() {
                let spaces = " ".repeat(PADDING + widths[c] - cell.chars().count());
                if c == 0 {
                    line.push_str(cell);
                    line.push_str(&spaces);
                } else {
                    line.push_str(&spaces);
                    line.push_str(cell);
                }
            }
            line
        })
        .collect();

    lines.join("\n")
}

/// Parse summary JSON and render it as a table
pub fn render_summary_table(json: &str) -> Result<String> {
    let input: TableInput =
        serde_json::from_str(json).context("Failed to parse summary JSON")?;
    Ok(table_to_string(&create_table(&input)))
}
