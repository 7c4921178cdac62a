use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::services::stats::types::{CategoryBucket, RangeSpec, Row};

/// Body of `POST /dashboard/analyze`. Field names mirror the JSON the
/// dashboard frontend sends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeDashboardRequest {
    pub rows: Vec<Row>,
    #[serde(default)]
    pub column_labels: HashMap<String, String>,
    #[serde(default)]
    pub name_column: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSelection {
    pub key: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// Body of `POST /columns/statistics`: explicit per-column analysis for the
/// columns the user selected, independent of auto-detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStatisticsRequest {
    pub rows: Vec<Row>,
    pub columns: Vec<ColumnSelection>,
}

fn default_bin_count() -> usize {
    10
}

/// Body of `POST /charts/histogram`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramRequest {
    pub values: Vec<f64>,
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,
}

/// Body of `POST /charts/quartiles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuartilesRequest {
    pub values: Vec<f64>,
}

/// Body of `POST /charts/pareto`: a category distribution, sorted or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParetoRequest {
    pub distribution: Vec<CategoryBucket>,
}

/// Body of `POST /charts/ranges`. Without explicit ranges the fixed currency
/// buckets of the dashboard apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeDistributionRequest {
    pub values: Vec<f64>,
    #[serde(default)]
    pub ranges: Option<Vec<RangeSpec>>,
}
