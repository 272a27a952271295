//! Shared utilities: command-line flag schemas and argv normalization.

pub mod args;

pub use args::{normalize_flags, ChartArgs, GenTomlsArgs};
