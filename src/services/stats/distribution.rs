use std::collections::HashMap;

use super::types::{CategoryBucket, ParetoPoint, RangeBucket, RangeSpec, Row};

/// The fixed currency buckets the dashboard uses when the caller does not
/// supply its own. Contiguous with a one-unit handoff; the top range is open.
pub fn default_currency_ranges() -> Vec<RangeSpec> {
    [
        ("0", 0.0, 0.0),
        ("1-50", 1.0, 50.0),
        ("51-100", 51.0, 100.0),
        ("101-200", 101.0, 200.0),
        ("201-500", 201.0, 500.0),
        ("501-1000", 501.0, 1000.0),
        ("1001+", 1001.0, f64::INFINITY),
    ]
    .into_iter()
    .map(|(label, min, max)| RangeSpec {
        label: label.to_string(),
        min,
        max,
    })
    .collect()
}

/// Groups rows by the display form of `category_key`, skipping rows where the
/// category is missing or empty. With a `value_key` the group value is the sum
/// of that column (unparseable cells count as zero); without one each row
/// contributes 1. Row occurrences are tracked either way. Result is sorted
/// descending by value, with percentages against the grand total (all zero
/// when the total is zero).
pub fn distribution(
    rows: &[Row],
    category_key: &str,
    value_key: Option<&str>,
) -> Vec<CategoryBucket> {
    let mut groups: HashMap<String, (f64, usize)> = HashMap::new();

    for row in rows {
        let category = match row.get(category_key) {
            Some(cell) if !cell.is_missing() => cell.to_string(),
            _ => continue,
        };
        let contribution = match value_key {
            Some(key) => row.get(key).map_or(0.0, |cell| cell.number_or_zero()),
            None => 1.0,
        };
        let entry = groups.entry(category).or_insert((0.0, 0));
        entry.0 += contribution;
        entry.1 += 1;
    }

    let total: f64 = groups.values().map(|(value, _)| value).sum();
    let mut buckets: Vec<CategoryBucket> = groups
        .into_iter()
        .map(|(category, (value, count))| CategoryBucket {
            category,
            value,
            count,
            percentage: if total > 0.0 { value / total * 100.0 } else { 0.0 },
        })
        .collect();

    buckets.sort_by(|a, b| b.value.total_cmp(&a.value));
    buckets
}

/// Prefix of an already-sorted distribution. No re-sort; asking for more items
/// than exist returns everything.
pub fn top_items(distribution: &[CategoryBucket], n: usize) -> Vec<CategoryBucket> {
    distribution.iter().take(n).cloned().collect()
}

/// Cumulative contribution ranking over a distribution. The input is re-sorted
/// descending here because callers may pass unsorted groups; percentages stay
/// zero when the total is zero.
pub fn pareto(distribution: &[CategoryBucket]) -> Vec<ParetoPoint> {
    let mut sorted: Vec<CategoryBucket> = distribution.to_vec();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));

    let total: f64 = sorted.iter().map(|b| b.value).sum();
    let mut cumulative = 0.0;
    sorted
        .into_iter()
        .map(|bucket| {
            cumulative += bucket.value;
            ParetoPoint {
                category: bucket.category,
                value: bucket.value,
                cumulative_value: cumulative,
                cumulative_percentage: if total > 0.0 {
                    cumulative / total * 100.0
                } else {
                    0.0
                },
            }
        })
        .collect()
}

/// Buckets values into the first range whose inclusive [min, max] contains
/// them. Percentages are shares of the overall summed amount; ranges nothing
/// fell into are dropped from the result.
pub fn range_distribution(values: &[f64], ranges: &[RangeSpec]) -> Vec<RangeBucket> {
    let mut counts = vec![0usize; ranges.len()];
    let mut amounts = vec![0.0f64; ranges.len()];

    for &value in values {
        if let Some(idx) = ranges
            .iter()
            .position(|r| value >= r.min && value <= r.max)
        {
            counts[idx] += 1;
            amounts[idx] += value;
        }
    }

    let total: f64 = values.iter().sum();
    ranges
        .iter()
        .enumerate()
        .filter(|(idx, _)| counts[*idx] > 0)
        .map(|(idx, range)| RangeBucket {
            label: range.label.clone(),
            count: counts[idx],
            amount: amounts[idx],
            percentage: if total > 0.0 {
                amounts[idx] / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}
