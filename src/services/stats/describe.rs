use super::types::{ColumnStatistics, Row};

/// Linear-interpolation (R-7 / Excel) percentile over an ascending slice.
///
/// Callers hand in data they have already sorted; this function does not sort
/// again. The precondition is asserted in debug builds only.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    debug_assert!((0.0..=100.0).contains(&p), "percentile out of range: {p}");
    debug_assert!(
        sorted.windows(2).all(|w| w[0] <= w[1]),
        "percentile input must be sorted ascending"
    );

    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let idx = p / 100.0 * (n - 1) as f64;
            let lo = idx.floor() as usize;
            let hi = idx.ceil() as usize;
            if lo == hi {
                sorted[lo]
            } else {
                sorted[lo] + (idx - lo as f64) * (sorted[hi] - sorted[lo])
            }
        }
    }
}

/// Pulls every parseable number out of one column. Missing cells and
/// non-numeric text are skipped, not zeroed.
pub(crate) fn numeric_values(rows: &[Row], key: &str) -> Vec<f64> {
    rows.iter()
        .filter_map(|row| row.get(key).and_then(|cell| cell.as_number()))
        .collect()
}

/// Descriptive statistics for one column. A column with no numeric values
/// reports zeros for every statistic while keeping `count` at the full row
/// total, so "no data" stays distinguishable from "all zero".
pub fn column_statistics(rows: &[Row], key: &str, label: &str) -> ColumnStatistics {
    let values = numeric_values(rows, key);

    if values.is_empty() {
        return ColumnStatistics {
            name: key.to_string(),
            label: label.to_string(),
            sum: 0.0,
            avg: 0.0,
            min: 0.0,
            max: 0.0,
            median: 0.0,
            std_dev: 0.0,
            count: rows.len(),
            non_null_count: 0,
            p25: 0.0,
            p75: 0.0,
            p90: 0.0,
            p95: 0.0,
        };
    }

    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    let avg = sum / n;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // Population variance (divide by N).
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n;

    let mut sorted = values.clone();
    sorted.sort_by(f64::total_cmp);

    ColumnStatistics {
        name: key.to_string(),
        label: label.to_string(),
        sum,
        avg,
        min,
        max,
        median: percentile(&sorted, 50.0),
        std_dev: variance.sqrt(),
        count: rows.len(),
        non_null_count: values.len(),
        p25: percentile(&sorted, 25.0),
        p75: percentile(&sorted, 75.0),
        p90: percentile(&sorted, 90.0),
        p95: percentile(&sorted, 95.0),
    }
}
