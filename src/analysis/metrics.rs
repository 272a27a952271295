//! Metric extraction from decoded log records.
//!
//! Two record shapes carry metrics and both are still produced by different
//! test plan versions:
//!
//! - V1: `{"event": {"type": "metric", "metric": {"name", "unit", "value"}}}`
//! - V2: `{"eventType": "Metric", "metric": {"name", "unit", "value"}}`
//!
//! Each shape gets its own adapter into [`MetricPayload`]; callers pick the
//! shape they understand with [`RecordShape`].

use indexmap::IndexMap;

use super::types::{LogRecord, MetricSample};
use crate::error::SwapbenchError;

/// Which record shape a consumer accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordShape {
    V1,
    V2,
}

/// How a metric name is turned into attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLayout {
    /// `key:value` segments separated by `/`
    KeyValue,
    /// Exactly `run:<n>/seq:<n>/file-size:<n>/<NodeType>/<metric>`
    Positional,
}

/// The `metric` object shared by both shapes
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPayload {
    pub name: String,
    pub unit: Option<String>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricEvent {
    V1(MetricPayload),
    V2(MetricPayload),
}

impl MetricEvent {
    /// Classify a record. `Ok(None)` means the record is not a metric event;
    /// an error means it claims to be one but its payload is unusable.
    pub fn from_record(record: &LogRecord) -> Result<Option<Self>, SwapbenchError> {
        if let Some(event) = Self::from_record_of(record, RecordShape::V1)? {
            return Ok(Some(event));
        }
        Self::from_record_of(record, RecordShape::V2)
    }

    /// Like [`MetricEvent::from_record`], but only the adapter for `shape` is
    /// tried. A record of the other shape is `Ok(None)` even if its payload is
    /// broken.
    pub fn from_record_of(record: &LogRecord, shape: RecordShape) -> Result<Option<Self>, SwapbenchError> {
        let payload = match shape {
            RecordShape::V1 => v1_payload(record),
            RecordShape::V2 => v2_payload(record),
        };
        match payload {
            None => Ok(None),
            Some(p) => p.map(|p| {
                Some(match shape {
                    RecordShape::V1 => MetricEvent::V1(p),
                    RecordShape::V2 => MetricEvent::V2(p),
                })
            }),
        }
    }

    pub fn shape(&self) -> RecordShape {
        match self {
            MetricEvent::V1(_) => RecordShape::V1,
            MetricEvent::V2(_) => RecordShape::V2,
        }
    }

    pub fn payload(&self) -> &MetricPayload {
        match self {
            MetricEvent::V1(p) | MetricEvent::V2(p) => p,
        }
    }

    pub fn into_payload(self) -> MetricPayload {
        match self {
            MetricEvent::V1(p) | MetricEvent::V2(p) => p,
        }
    }
}

fn v1_payload(record: &LogRecord) -> Option<Result<MetricPayload, SwapbenchError>> {
    let event = record.get("event")?;
    if event.get("type").and_then(|t| t.as_str()) != Some("metric") {
        return None;
    }
    Some(read_payload(event.get("metric")))
}

fn v2_payload(record: &LogRecord) -> Option<Result<MetricPayload, SwapbenchError>> {
    if record.get("eventType").and_then(|t| t.as_str()) != Some("Metric") {
        return None;
    }
    Some(read_payload(record.get("metric")))
}

fn read_payload(metric: Option<&LogRecord>) -> Result<MetricPayload, SwapbenchError> {
    let metric = metric.ok_or(SwapbenchError::MissingMetricField { field: "metric" })?;
    let name = metric
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or(SwapbenchError::MissingMetricField { field: "name" })?;
    let value = metric
        .get("value")
        .and_then(|v| v.as_f64())
        .ok_or(SwapbenchError::MissingMetricField { field: "value" })?;
    let unit = metric
        .get("unit")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(MetricPayload {
        name: name.to_string(),
        unit,
        value,
    })
}

/// Split a metric name on `/`, then each segment on `:`.
///
/// Only the text between the first and second `:` becomes the value. A
/// segment with no `:` yields a key with no value; a repeated key keeps its
/// first position and takes the later value.
pub fn decode_metric_name(name: &str) -> IndexMap<String, Option<String>> {
    let mut attributes = IndexMap::new();
    for segment in name.split('/') {
        let mut pieces = segment.split(':');
        let key = pieces.next().unwrap_or_default();
        let value = pieces.next().map(|v| v.to_string());
        attributes.insert(key.to_string(), value);
    }
    attributes
}

/// Decode the legacy five-part positional name
pub fn decode_positional_name(name: &str) -> Result<IndexMap<String, Option<String>>, SwapbenchError> {
    let parts: Vec<&str> = name.split('/').collect();
    let &[run, seq, file_size, node_type, metric] = parts.as_slice() else {
        return Err(SwapbenchError::MalformedMetricName {
            name: name.to_string(),
            parts: parts.len(),
        });
    };

    let after_colon = |s: &str| s.split(':').nth(1).map(|v| v.to_string());

    let mut attributes = IndexMap::new();
    attributes.insert("run".to_string(), after_colon(run));
    attributes.insert("seq".to_string(), after_colon(seq));
    attributes.insert("fileSize".to_string(), after_colon(file_size));
    attributes.insert("nodeType".to_string(), Some(node_type.to_string()));
    attributes.insert("name".to_string(), Some(metric.to_string()));
    Ok(attributes)
}

/// Build a sample from a metric payload
pub fn to_sample(payload: MetricPayload, layout: NameLayout) -> Result<MetricSample, SwapbenchError> {
    let attributes = match layout {
        NameLayout::KeyValue => decode_metric_name(&payload.name),
        NameLayout::Positional => decode_positional_name(&payload.name)?,
    };
    Ok(MetricSample {
        metric: payload.name,
        attributes,
        value: payload.value,
        unit: payload.unit,
    })
}

/// Extract every metric of the given shape from `records`, in order.
/// Metric events of the other shape are ignored, malformed or not.
pub fn extract_samples(
    records: &[LogRecord],
    shape: RecordShape,
    layout: NameLayout,
) -> Result<Vec<MetricSample>, SwapbenchError> {
    let mut samples = Vec::new();
    for record in records {
        let Some(event) = MetricEvent::from_record_of(record, shape)? else {
            continue;
        };
        samples.push(to_sample(event.into_payload(), layout)?);
    }
    Ok(samples)
}
