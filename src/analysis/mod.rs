//! Benchmark log aggregation.
//!
//! Raw log text flows one way through this module: lines are decoded into
//! records, metric events are extracted into samples, samples are grouped and
//! reduced to statistics.

pub mod types;
pub mod log_parser;
pub mod metrics;
pub mod grouping;
pub mod stats;
pub mod summary;
pub mod suite;

pub use types::*;
pub use log_parser::{parse_lines, parse_log_file, read_stdin};
pub use metrics::{extract_samples, MetricEvent, NameLayout, RecordShape};
pub use summary::aggregate_records;
pub use suite::{aggregate_suite, write_suite, Suite};
