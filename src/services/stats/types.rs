use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Provenance keys stamped on rows by the upload layer. Never treated as data.
pub const SOURCE_FILE_KEY: &str = "_sourceFileName";
pub const SOURCE_SHEET_KEY: &str = "_sourceSheetName";

pub fn is_metadata_key(key: &str) -> bool {
    key == SOURCE_FILE_KEY || key == SOURCE_SHEET_KEY
}

/// A single spreadsheet cell. Rows are schemaless, so every cell is one of
/// these four shapes; `Missing` covers JSON null and absent keys alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Date(NaiveDate),
    Text(String),
    Missing,
}

impl CellValue {
    /// Numeric coercion: native numbers pass through, text is trimmed and
    /// float-parsed. Dates and missing values never coerce.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// The silent-zero fallback aggregation call sites rely on.
    pub fn number_or_zero(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }

    /// Null, undefined and empty string are all "missing" to the engine.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Missing => Ok(()),
        }
    }
}

/// One spreadsheet row. IndexMap keeps column first-seen order stable across
/// JSON round-trips, which column detection depends on.
pub type Row = IndexMap<String, CellValue>;

/// Descriptive statistics for one numeric column.
///
/// `count` is the total row count including misses; `non_null_count` is how
/// many rows contributed a parseable number. A column with no numeric data
/// reports zeros everywhere but keeps `count`, so consumers can tell
/// "no data" apart from "all zero" via `non_null_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatistics {
    pub name: String,
    pub label: String,
    pub sum: f64,
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub std_dev: f64,
    pub count: usize,
    pub non_null_count: usize,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
}

/// One bucket of a time aggregation. `date` anchors the bucket at the first
/// day of its period and is what chronological sorting uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub period: String,
    pub value: f64,
    pub count: usize,
    pub date: NaiveDate,
}

/// One group of a category distribution. `value` is either a sum of a value
/// column or a plain occurrence count depending on the call; `count` is
/// always the number of rows in the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBucket {
    pub category: String,
    pub value: f64,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub bin_start: f64,
    pub bin_end: f64,
    pub count: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramData {
    pub bins: Vec<HistogramBin>,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

/// Box-plot statistics. `min`/`max` are the whisker bounds (nearest sample
/// values inside the Tukey fences), NOT the dataset extremes; the raw
/// extremes of an outlier-bearing sample are in `outliers`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub iqr: f64,
    pub outliers: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoPoint {
    pub category: String,
    pub value: f64,
    pub cumulative_value: f64,
    pub cumulative_percentage: f64,
}

/// One currency range for range distribution; `max` may be infinite for the
/// open-ended top range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSpec {
    pub label: String,
    pub min: f64,
    #[serde(default = "unbounded")]
    pub max: f64,
}

fn unbounded() -> f64 {
    f64::INFINITY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeBucket {
    pub label: String,
    pub count: usize,
    pub amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesReport {
    pub monthly: Vec<TimeSeriesPoint>,
    pub quarterly: Vec<TimeSeriesPoint>,
    pub yearly: Vec<TimeSeriesPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distributions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_name: Option<Vec<CategoryBucket>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub by_source_file: Option<Vec<CategoryBucket>>,
}

/// Everything the dashboard needs in one pass over the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalysis {
    pub column_statistics: Vec<ColumnStatistics>,
    pub numeric_columns: Vec<String>,
    pub date_columns: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_series: Option<TimeSeriesReport>,
    pub distributions: Distributions,
    pub top_donors: Vec<CategoryBucket>,
    pub total_rows: usize,
    pub filtered_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
}
