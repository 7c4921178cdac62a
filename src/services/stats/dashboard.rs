use std::collections::HashMap;

use rayon::prelude::*;

use super::describe::column_statistics;
use super::detect::{detect_date_columns, detect_numeric_columns, parse_date};
use super::distribution::{distribution, top_items};
use super::timeseries::aggregate_by_time;
use super::types::{
    DashboardAnalysis, DateRange, Distributions, Granularity, Row, TimeSeriesReport,
    SOURCE_FILE_KEY,
};

const TOP_DONOR_COUNT: usize = 10;

/// Min/max parsed date over one column; rows that do not parse are skipped,
/// matching the time aggregation.
fn date_range_of(rows: &[Row], date_key: &str) -> Option<DateRange> {
    let mut range: Option<DateRange> = None;
    for row in rows {
        let Some(date) = row.get(date_key).and_then(parse_date) else {
            continue;
        };
        range = Some(match range {
            None => DateRange { from: date, to: date },
            Some(r) => DateRange {
                from: r.from.min(date),
                to: r.to.max(date),
            },
        });
    }
    range
}

/// One pass over the table producing everything the dashboard renders.
///
/// Time series and distributions are single-column analyses over the FIRST
/// detected date and numeric columns; multi-column views are built by calling
/// the per-column functions directly.
pub fn analyze_for_dashboard(
    rows: &[Row],
    column_labels: &HashMap<String, String>,
    name_column: Option<&str>,
) -> DashboardAnalysis {
    let numeric_columns = detect_numeric_columns(rows);
    let date_columns = detect_date_columns(rows);

    let column_stats = numeric_columns
        .par_iter()
        .map(|key| {
            let label = column_labels.get(key).map_or(key.as_str(), String::as_str);
            column_statistics(rows, key, label)
        })
        .collect();

    let first_numeric = numeric_columns.first().map(String::as_str);
    let first_date = date_columns.first().map(String::as_str);

    let time_series = match (first_date, first_numeric) {
        (Some(date_key), Some(value_key)) => Some(TimeSeriesReport {
            monthly: aggregate_by_time(rows, date_key, value_key, Granularity::Monthly),
            quarterly: aggregate_by_time(rows, date_key, value_key, Granularity::Quarterly),
            yearly: aggregate_by_time(rows, date_key, value_key, Granularity::Yearly),
        }),
        _ => None,
    };

    let by_name = match (name_column, first_numeric) {
        (Some(name_key), Some(value_key)) => Some(distribution(rows, name_key, Some(value_key))),
        _ => None,
    };
    let by_source_file = if rows.iter().any(|row| row.contains_key(SOURCE_FILE_KEY)) {
        Some(distribution(rows, SOURCE_FILE_KEY, first_numeric))
    } else {
        None
    };

    let top_donors = by_name
        .as_deref()
        .map(|dist| top_items(dist, TOP_DONOR_COUNT))
        .unwrap_or_default();

    let date_range = first_date.and_then(|date_key| date_range_of(rows, date_key));

    DashboardAnalysis {
        column_statistics: column_stats,
        numeric_columns,
        date_columns,
        time_series,
        distributions: Distributions {
            by_name,
            by_source_file,
        },
        top_donors,
        total_rows: rows.len(),
        filtered_rows: rows.len(),
        date_range,
    }
}
