use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};

use super::detect::parse_date;
use super::types::{Granularity, Row, TimeSeriesPoint};

/// Period key plus the first day of the period, which is what chronological
/// sorting uses. Quarter keys like "2024-Q4" do not sort lexically across
/// year boundaries, so the anchor date is authoritative.
fn period_of(date: NaiveDate, granularity: Granularity) -> (String, NaiveDate) {
    let year = date.year();
    match granularity {
        Granularity::Monthly => (
            format!("{:04}-{:02}", year, date.month()),
            NaiveDate::from_ymd_opt(year, date.month(), 1).unwrap_or(date),
        ),
        Granularity::Quarterly => {
            let quarter = date.month0() / 3 + 1;
            (
                format!("{:04}-Q{}", year, quarter),
                NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1).unwrap_or(date),
            )
        }
        Granularity::Yearly => (
            format!("{:04}", year),
            NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(date),
        ),
    }
}

/// Buckets rows into period sums keyed by a date column. Rows whose date cell
/// does not parse are dropped silently; value cells that do not parse count
/// as zero but still bump the bucket's row count.
pub fn aggregate_by_time(
    rows: &[Row],
    date_key: &str,
    value_key: &str,
    granularity: Granularity,
) -> Vec<TimeSeriesPoint> {
    let mut buckets: HashMap<String, TimeSeriesPoint> = HashMap::new();

    for row in rows {
        let Some(date) = row.get(date_key).and_then(parse_date) else {
            continue;
        };
        let (period, anchor) = period_of(date, granularity);
        let value = row.get(value_key).map_or(0.0, |cell| cell.number_or_zero());

        let point = buckets.entry(period.clone()).or_insert(TimeSeriesPoint {
            period,
            value: 0.0,
            count: 0,
            date: anchor,
        });
        point.value += value;
        point.count += 1;
    }

    let mut points: Vec<TimeSeriesPoint> = buckets.into_values().collect();
    points.sort_by_key(|p| p.date);
    points
}
