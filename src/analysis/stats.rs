//! Summary statistics over buckets of metric values.

use super::types::Stats;

/// Arithmetic mean, or `None` for an empty slice
pub fn average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

impl Stats {
    /// Compute min, max, average and the positional `mean` of `values`.
    /// Returns `None` for an empty bucket so no NaN ever reaches output.
    pub fn from_values(values: &[f64]) -> Option<Stats> {
        let average = average(values)?;

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Stats {
            average,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            mean: sorted[sorted.len() / 2],
        })
    }
}
