//! # Swapbench - result tooling for data-transfer benchmark runs
//!
//! This library turns the newline-delimited JSON logs written by transfer
//! benchmark test plans into summaries, per-run point series, gnuplot
//! scripts and text tables, and generates the TOML compositions that drive
//! version-compatibility suites.
//!
//! ## Pipeline
//!
//! Data flows one way, and every stage is a plain function over the output of
//! the previous one:
//!
//! 1. **Line parsing** (`analysis::log_parser`): split on newlines, decode each
//!    line as JSON, drop lines that do not decode.
//! 2. **Metric extraction** (`analysis::metrics`): recognise metric events in
//!    either record shape and decode their `/`- and `:`-delimited names into
//!    attributes.
//! 3. **Grouping and statistics** (`analysis::grouping`, `analysis::stats`,
//!    `analysis::summary`, `analysis::suite`): partition samples by attribute
//!    and reduce each bucket to min/max/average/mean or per-run averages.
//! 4. **Emitters** (`output`): CSV points, gnuplot scripts, fixed-width tables.
//!
//! ## Modules
//!
//! - `analysis`: parsing, extraction, grouping and statistics
//! - `output`: CSV, plot script and table emitters plus result discovery
//! - `testplan`: test-plan definitions and TOML composition rendering
//! - `utils`: command-line flag schemas
//! - `error`: domain errors
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use swapbench::analysis;
//!
//! let records = analysis::parse_log_file(std::path::Path::new("run.out"))?;
//! let summary = analysis::aggregate_records(&records)?;
//! println!("{} seeds, {} leeches", summary.seed.count, summary.leech.count);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Malformed log lines and missing optional files are skipped. Everything
//! else is fatal: public functions return `color_eyre::Result`, with domain
//! failures described by [`error::SwapbenchError`].

pub mod analysis;
pub mod error;
pub mod output;
pub mod testplan;
pub mod utils;

pub use error::SwapbenchError;
