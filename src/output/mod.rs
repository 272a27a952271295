//! Emitters: CSV point series, gnuplot scripts and fixed-width tables.

pub mod chart;
pub mod csv;
pub mod discovery;
pub mod plot;
pub mod table;

pub use chart::{write_chart, ChartRequest};
pub use discovery::{discover_results, ChartLayout, ResultFile};
pub use plot::{render_plot, ColorAllocator, PlotOptions, PlotSeries};
pub use table::{render_summary_table, table_to_string};

/// Render a number the shortest way that reads back to the same value:
/// integral values have no fractional part (`2`, not `2.0`).
///
/// Exponent notation is never used, however small or large the magnitude:
/// `1e-7` is written `0.0000001` and `1e21` is written
/// `1000000000000000000000`, not `1e-7` / `1e+21`. gnuplot reads both forms.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}
