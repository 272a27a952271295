//! Test-plan definitions: the versions under comparison and the suites that
//! mix them.
//!
//! Definitions are YAML (or JSON, which parses as YAML):
//!
//! ```yaml
//! versions:
//!   - name: old-bitswap
//!     ref: dcfe40e
//!     testgroundId: haves_support_no
//!   - name: master
//!     ref: master
//!     testgroundId: haves_support_yes
//! suites:
//!   master-from-2old:
//!     seed:  [{ count: 2, version: old-bitswap }]
//!     leech: [{ count: 1, version: master }]
//! ```

use std::fs::File;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A code version that test instances can be built from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDef {
    pub name: String,
    /// Git ref of the dependency to build against
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Group id used in the generated composition
    pub testground_id: String,
}

/// `count` instances built from `version`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub count: u32,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuiteDef {
    #[serde(default)]
    pub seed: Vec<Allocation>,
    #[serde(default)]
    pub leech: Vec<Allocation>,
}

/// `[metadata]` of generated compositions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default = "default_metadata_name")]
    pub name: String,
    #[serde(default = "default_metadata_author")]
    pub author: String,
}

fn default_metadata_name() -> String {
    "transfer-versions".to_string()
}

fn default_metadata_author() -> String {
    "swapbench".to_string()
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            name: default_metadata_name(),
            author: default_metadata_author(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPlanDefinition {
    #[serde(default)]
    pub metadata: Metadata,
    pub versions: Vec<VersionDef>,
    /// Suites in file order
    pub suites: IndexMap<String, SuiteDef>,
}

impl TestPlanDefinition {
    pub fn version(&self, name: &str) -> Option<&VersionDef> {
        self.versions.iter().find(|v| v.name == name)
    }
}

/// Load a definition file
pub fn load_definition(path: &Path) -> Result<TestPlanDefinition> {
    log::info!("Loading test plan definition from: {:?}", path);

    let file = File::open(path)
        .with_context(|| format!("Failed to open definition file: {}", path.display()))?;
    let definition: TestPlanDefinition = serde_yaml::from_reader(file)
        .with_context(|| format!("Failed to parse definition file: {}", path.display()))?;

    log::info!(
        "Loaded {} versions and {} suites",
        definition.versions.len(),
        definition.suites.len()
    );
    Ok(definition)
}

/// Global test parameters written into every group, in output order
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalParams(pub IndexMap<String, String>);

impl Default for GlobalParams {
    fn default() -> Self {
        let mut params = IndexMap::new();
        params.insert("latency_ms".to_string(), "5".to_string());
        params.insert("bandwidth_mb".to_string(), "1024".to_string());
        params.insert("file_size".to_string(), "1485760".to_string());
        params.insert("seed_fraction".to_string(), String::new());
        params.insert("run_count".to_string(), "1".to_string());
        Self(params)
    }
}

impl GlobalParams {
    /// Replace a known parameter. Unknown keys and empty values are ignored.
    pub fn set(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        if let Some(slot) = self.0.get_mut(key) {
            *slot = value.to_string();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}
