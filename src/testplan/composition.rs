//! TOML composition rendering, one file per suite.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use indexmap::IndexMap;
use serde::Serialize;

use super::definition::{GlobalParams, Metadata, SuiteDef, TestPlanDefinition};
use crate::error::SwapbenchError;

/// Module whose version differs between groups
pub const DEPENDENCY_MODULE: &str = "github.com/ipfs/go-bitswap";

/// One composition file
#[derive(Debug, Serialize)]
pub struct Composition<'a> {
    pub metadata: &'a Metadata,
    pub global: Global,
    pub groups: Vec<Group>,
}

/// `[global]`: the plan and case every group runs
#[derive(Debug, Serialize)]
pub struct Global {
    pub plan: &'static str,
    pub case: &'static str,
    pub builder: &'static str,
    pub runner: &'static str,
    pub total_instances: u32,
}

impl Global {
    fn new(total_instances: u32) -> Self {
        Self {
            plan: "bitswap-tuning",
            case: "transfer",
            builder: "docker:go",
            runner: "local:docker",
            total_instances,
        }
    }
}

/// `[[groups]]`: every instance built from one version
#[derive(Debug, Serialize)]
pub struct Group {
    pub id: String,
    pub instances: Instances,
    pub build: Build,
    pub run: Run,
}

#[derive(Debug, Serialize)]
pub struct Instances {
    pub count: u32,
}

#[derive(Debug, Serialize)]
pub struct Build {
    pub dependencies: Vec<Dependency>,
}

#[derive(Debug, Serialize)]
pub struct Dependency {
    pub module: &'static str,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct Run {
    pub test_params: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct GroupCounts {
    seeds: u32,
    leeches: u32,
}

/// Build the composition for one suite. Groups follow the first appearance
/// of each version, seeds before leeches.
pub fn build_composition<'a>(
    name: &str,
    suite: &SuiteDef,
    definition: &'a TestPlanDefinition,
    globals: &GlobalParams,
) -> Result<Composition<'a>, SwapbenchError> {
    let mut counts: IndexMap<&str, GroupCounts> = IndexMap::new();
    for seed in &suite.seed {
        counts.entry(seed.version.as_str()).or_default().seeds += seed.count;
    }
    for leech in &suite.leech {
        counts.entry(leech.version.as_str()).or_default().leeches += leech.count;
    }
    let seed_count: u32 = suite.seed.iter().map(|a| a.count).sum();
    let leech_count: u32 = suite.leech.iter().map(|a| a.count).sum();

    let mut groups = Vec::with_capacity(counts.len());
    for (version, group_counts) in &counts {
        let version_def = definition
            .version(version)
            .ok_or_else(|| SwapbenchError::UnknownVersion {
                suite: name.to_string(),
                version: version.to_string(),
            })?;

        let mut test_params: IndexMap<String, String> = globals
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        test_params.insert("seed_count".to_string(), seed_count.to_string());
        test_params.insert("leech_count".to_string(), leech_count.to_string());
        if counts.len() > 1 {
            test_params.insert(
                format!("{}_leech_count", version_def.testground_id),
                group_counts.leeches.to_string(),
            );
        }

        groups.push(Group {
            id: version_def.testground_id.clone(),
            instances: Instances {
                count: group_counts.seeds + group_counts.leeches,
            },
            build: Build {
                dependencies: vec![Dependency {
                    module: DEPENDENCY_MODULE,
                    version: version_def.git_ref.clone(),
                }],
            },
            run: Run { test_params },
        });
    }

    Ok(Composition {
        metadata: &definition.metadata,
        global: Global::new(seed_count + leech_count),
        groups,
    })
}

/// Render the composition for one suite as TOML, headed by a `# <name>`
/// comment
pub fn render_suite(
    name: &str,
    suite: &SuiteDef,
    definition: &TestPlanDefinition,
    globals: &GlobalParams,
) -> Result<String, SwapbenchError> {
    let composition = build_composition(name, suite, definition, globals)?;
    let body = toml::to_string(&composition).map_err(|source| SwapbenchError::CompositionSerialize {
        suite: name.to_string(),
        source,
    })?;

    // a line break in the name would end the comment early
    let comment: Vec<&str> = name.lines().collect();
    Ok(format!("# {}\n\n{}", comment.join(" "), body))
}

/// File name for a suite: anything outside `[A-Za-z0-9-]` becomes `_`
pub fn composition_file_name(suite_name: &str) -> String {
    let safe: String = suite_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect();
    format!("{}.toml", safe)
}

/// Write one composition per suite into `out_dir`, creating it if needed
pub fn write_compositions(
    definition: &TestPlanDefinition,
    globals: &GlobalParams,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory '{}'", out_dir.display()))?;

    let mut written = Vec::new();
    for (name, suite) in &definition.suites {
        let content = render_suite(name, suite, definition, globals)?;
        let path = out_dir.join(composition_file_name(name));
        fs::write(&path, content)
            .with_context(|| format!("Failed to write composition to {}", path.display()))?;
        log::info!("Wrote composition {}", path.display());
        written.push(path);
    }
    Ok(written)
}
