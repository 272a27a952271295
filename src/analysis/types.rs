//! Core data types for benchmark log aggregation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A decoded log line. Fields vary by record, so it stays loosely typed.
pub type LogRecord = serde_json::Value;

/// Label used for a grouping key whose value is missing
pub const UNDEFINED_LABEL: &str = "undefined";

/// Role of a test instance in a transfer benchmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Serves content
    Seed,
    /// Fetches content
    Leech,
    /// Neither message was logged
    Passive,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Seed, Role::Leech, Role::Passive];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Seed => write!(f, "seed"),
            Role::Leech => write!(f, "leech"),
            Role::Passive => write!(f, "passive"),
        }
    }
}

/// One metric value with the categorical attributes decoded from its name.
///
/// An attribute whose name segment carried no `:` is present with a `None`
/// value, so grouping on it lands in the `"undefined"` bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Metric name exactly as logged
    pub metric: String,
    pub attributes: IndexMap<String, Option<String>>,
    pub value: f64,
    pub unit: Option<String>,
}

impl MetricSample {
    /// Grouping label for `key`: the attribute value, or `"undefined"` when the
    /// attribute is absent or has no value.
    pub fn label(&self, key: &str) -> &str {
        self.attributes
            .get(key)
            .and_then(|v| v.as_deref())
            .unwrap_or(UNDEFINED_LABEL)
    }
}

/// Everything recorded for one test instance during a run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstanceSummary {
    pub instance_id: String,
    /// `None` until a seed/leech announcement is seen
    pub role: Option<Role>,
    pub samples: Vec<MetricSample>,
}

impl InstanceSummary {
    pub fn new(instance_id: String) -> Self {
        Self {
            instance_id,
            role: None,
            samples: Vec::new(),
        }
    }

    /// Role used for bucketing; unannounced instances are passive
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or(Role::Passive)
    }
}

/// Summary statistics of a non-empty bucket of values.
///
/// `mean` is the element at index `n / 2` of the ascending sort, which is only
/// the median when `n` is odd. Downstream tables depend on that value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub average: f64,
    pub max: f64,
    pub mean: f64,
    pub min: f64,
}

/// Statistics for one metric name within a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub stats: Stats,
}

/// Instance count and per-metric statistics for one role
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RoleSummary {
    pub count: usize,
    pub metrics: IndexMap<String, MetricSummary>,
}

/// Output of the `aggregate` command
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub seed: RoleSummary,
    pub leech: RoleSummary,
    pub passive: RoleSummary,
}

impl AggregateSummary {
    pub fn role(&self, role: Role) -> &RoleSummary {
        match role {
            Role::Seed => &self.seed,
            Role::Leech => &self.leech,
            Role::Passive => &self.passive,
        }
    }

    pub fn role_mut(&mut self, role: Role) -> &mut RoleSummary {
        match role {
            Role::Seed => &mut self.seed,
            Role::Leech => &mut self.leech,
            Role::Passive => &mut self.passive,
        }
    }
}

/// A single `(x, y)` point of an emitted series. `x` keeps the label text it
/// was grouped under (e.g. a file size).
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub x: String,
    pub y: f64,
}

impl Point {
    pub fn new(x: impl Into<String>, y: f64) -> Self {
        Self { x: x.into(), y }
    }
}

/// Points for one combination of grouping labels
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    /// Group labels from outermost to innermost
    pub labels: Vec<String>,
    pub points: Vec<Point>,
}
