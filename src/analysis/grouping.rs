//! Insertion-ordered grouping of samples by attribute labels.

use indexmap::IndexMap;

use super::types::MetricSample;

/// Partition `items` by the label `key` produces, keeping both group order and
/// item order as first seen
pub fn group_by<T, F>(items: impl IntoIterator<Item = T>, key: F) -> IndexMap<String, Vec<T>>
where
    F: Fn(&T) -> String,
{
    let mut groups: IndexMap<String, Vec<T>> = IndexMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

/// Group samples by one attribute; missing values group under `"undefined"`
pub fn group_by_attribute<'a>(
    samples: impl IntoIterator<Item = &'a MetricSample>,
    attribute: &str,
) -> IndexMap<String, Vec<&'a MetricSample>> {
    group_by(samples, |s| s.label(attribute).to_string())
}

/// Order run labels numerically. Labels that are not integers keep their
/// relative order after all numeric ones.
pub fn sort_run_labels(labels: &mut [String]) {
    labels.sort_by_key(|label| match label.trim().parse::<i64>() {
        Ok(n) => (false, n),
        Err(_) => (true, 0),
    });
}
