//! Domain errors raised by the aggregation pipeline and the test-plan generator.
//!
//! I/O and serialization failures are not listed here; they are wrapped with
//! `color_eyre` context at the call site so the offending path is reported.

/// Errors that abort a run
#[derive(Debug, thiserror::Error)]
pub enum SwapbenchError {
    #[error("Unexpected metric format {name:?}: expected 5 '/'-separated parts, found {parts}")]
    MalformedMetricName { name: String, parts: usize },

    #[error("Metric payload is missing field '{field}'")]
    MissingMetricField { field: &'static str },

    #[error("Suite '{suite}' references unknown version '{version}'")]
    UnknownVersion { suite: String, version: String },

    #[error("Failed to serialize composition for suite '{suite}': {source}")]
    CompositionSerialize {
        suite: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Unknown suite '{0}' (expected legacy, perf, peer-selection or version-compat)")]
    UnknownSuite(String),
}
