//! Test-plan composition generation for version-compatibility suites.
//!
//! A definition lists the versions under test and, per suite, how many seed
//! and leech instances run each version. Every suite becomes one TOML
//! composition file.

pub mod composition;
pub mod definition;

pub use composition::{composition_file_name, render_suite, write_compositions};
pub use definition::{load_definition, GlobalParams, TestPlanDefinition};
