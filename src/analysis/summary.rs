//! Per-instance collection and per-role statistics for a single run.
//!
//! Roles are announced by instances through plain log messages. The whole
//! record set is scanned before any statistic is computed, so a role applies
//! to every sample of its instance regardless of message order.

use indexmap::IndexMap;

use color_eyre::eyre::Result;

use super::metrics::{to_sample, MetricEvent, NameLayout, RecordShape};
use super::types::*;

/// Message logged by an instance that serves content
pub const SEED_MESSAGE: &str = "I am a seed";
/// Message logged by an instance that fetches content
pub const LEECH_MESSAGE: &str = "I am a leech";

/// Role announced by an exact log message, if any
pub fn classify_message(msg: &str) -> Option<Role> {
    match msg {
        SEED_MESSAGE => Some(Role::Seed),
        LEECH_MESSAGE => Some(Role::Leech),
        _ => None,
    }
}

/// Build one summary per instance id, in first-seen order.
///
/// Records without a string `instanceId` cannot be attributed and are
/// skipped. Only V2 (`eventType: "Metric"`) metric events are read, with the
/// name decoded as `key:value` segments; V1 events are ignored.
pub fn collect_instances(records: &[LogRecord]) -> Result<IndexMap<String, InstanceSummary>> {
    let mut instances: IndexMap<String, InstanceSummary> = IndexMap::new();
    let mut unattributed = 0usize;

    for record in records {
        let Some(instance_id) = record.get("instanceId").and_then(|v| v.as_str()) else {
            unattributed += 1;
            continue;
        };
        let instance = instances
            .entry(instance_id.to_string())
            .or_insert_with(|| InstanceSummary::new(instance_id.to_string()));

        if let Some(role) = record
            .get("msg")
            .and_then(|v| v.as_str())
            .and_then(classify_message)
        {
            instance.role = Some(role);
        }

        if let Some(event) = MetricEvent::from_record_of(record, RecordShape::V2)? {
            instance
                .samples
                .push(to_sample(event.into_payload(), NameLayout::KeyValue)?);
        }
    }

    if unattributed > 0 {
        log::debug!("Skipped {} records without an instanceId", unattributed);
    }
    Ok(instances)
}

/// Bucket every instance by role and reduce each metric to [`Stats`]
pub fn summarize(instances: &IndexMap<String, InstanceSummary>) -> AggregateSummary {
    let mut summary = AggregateSummary::default();

    for role in Role::ALL {
        let members: Vec<&InstanceSummary> = instances
            .values()
            .filter(|i| i.effective_role() == role)
            .collect();

        let mut values: IndexMap<&str, Vec<f64>> = IndexMap::new();
        let mut units: IndexMap<&str, &str> = IndexMap::new();
        for sample in members.iter().flat_map(|i| i.samples.iter()) {
            values.entry(sample.metric.as_str()).or_default().push(sample.value);
            if let Some(unit) = sample.unit.as_deref() {
                units.entry(sample.metric.as_str()).or_insert(unit);
            }
        }

        let role_summary = summary.role_mut(role);
        role_summary.count = members.len();
        for (metric, vals) in values {
            let Some(stats) = Stats::from_values(&vals) else {
                continue;
            };
            role_summary.metrics.insert(
                metric.to_string(),
                MetricSummary {
                    unit: units.get(metric).map(|u| u.to_string()),
                    stats,
                },
            );
        }
    }

    summary
}

/// Full pipeline from decoded records to the role summary
pub fn aggregate_records(records: &[LogRecord]) -> Result<AggregateSummary> {
    let instances = collect_instances(records)?;
    log::info!("Collected {} instances", instances.len());
    Ok(summarize(&instances))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metric(instance: &str, name: &str, value: f64) -> LogRecord {
        json!({
            "instanceId": instance,
            "eventType": "Metric",
            "metric": {"name": name, "unit": "bytes", "value": value}
        })
    }

    #[test]
    fn test_basic_aggregate() {
        let records = vec![
            json!({"instanceId": "a", "msg": "I am a seed"}),
            metric("a", "bytes_sent", 100.0),
            json!({"instanceId": "b", "msg": "I am a leech"}),
            metric("b", "bytes_sent", 50.0),
        ];
        let summary = aggregate_records(&records).unwrap();

        assert_eq!(summary.seed.count, 1);
        let seed = &summary.seed.metrics["bytes_sent"];
        assert_eq!(seed.unit.as_deref(), Some("bytes"));
        assert_eq!(seed.stats.min, 100.0);
        assert_eq!(seed.stats.max, 100.0);
        assert_eq!(seed.stats.average, 100.0);

        assert_eq!(summary.leech.count, 1);
        assert_eq!(summary.leech.metrics["bytes_sent"].stats.average, 50.0);

        assert_eq!(summary.passive.count, 0);
        assert!(summary.passive.metrics.is_empty());
    }

    #[test]
    fn test_role_applies_regardless_of_order() {
        let records = vec![
            metric("a", "blks_sent", 4.0),
            metric("a", "blks_sent", 6.0),
            json!({"instanceId": "a", "msg": "I am a seed"}),
        ];
        let summary = aggregate_records(&records).unwrap();
        assert_eq!(summary.seed.count, 1);
        assert_eq!(summary.seed.metrics["blks_sent"].stats.average, 5.0);
        assert_eq!(summary.passive.count, 0);
    }

    #[test]
    fn test_unannounced_instance_is_passive() {
        let records = vec![
            json!({"instanceId": "c", "msg": "I am a passive node (neither leech nor seed)"}),
            metric("c", "msgs_rcvd", 2.0),
        ];
        let instances = collect_instances(&records).unwrap();
        assert_eq!(instances["c"].role, None);
        assert_eq!(instances["c"].effective_role(), Role::Passive);

        let summary = summarize(&instances);
        assert_eq!(summary.passive.count, 1);
        assert_eq!(summary.passive.metrics["msgs_rcvd"].stats.max, 2.0);
    }

    #[test]
    fn test_v1_metrics_are_ignored() {
        let records = vec![
            json!({"instanceId": "a", "msg": "I am a seed"}),
            json!({"instanceId": "a", "event": {"type": "metric", "metric": {"name": "bytes_sent", "value": 7}}}),
            json!({"instanceId": "a", "event": {"type": "metric", "metric": {"unit": "bytes"}}}),
            metric("a", "blks_sent", 3.0),
        ];
        let summary = aggregate_records(&records).unwrap();
        assert_eq!(summary.seed.count, 1);
        let names: Vec<&String> = summary.seed.metrics.keys().collect();
        assert_eq!(names, vec!["blks_sent"]);
    }

    #[test]
    fn test_records_without_instance_are_ignored() {
        let records = vec![json!({"msg": "I am a seed"}), json!("text")];
        let instances = collect_instances(&records).unwrap();
        assert!(instances.is_empty());
    }

    #[test]
    fn test_classify_message_is_exact() {
        assert_eq!(classify_message("I am a seed"), Some(Role::Seed));
        assert_eq!(classify_message("I am a leech"), Some(Role::Leech));
        assert_eq!(classify_message("I am a seed!"), None);
        assert_eq!(classify_message("i am a leech"), None);
    }
}
