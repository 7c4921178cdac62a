use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::{
    error::AppError,
    models::{HistogramRequest, ParetoRequest, QuartilesRequest, RangeDistributionRequest},
    services::stats::{
        default_currency_ranges, histogram, pareto, quartiles, range_distribution,
        types::{HistogramData, ParetoPoint, Quartiles, RangeBucket},
    },
    AppState,
};

/// Chart-shaped views over raw value samples. The dashboard calls these per
/// selected column, on top of the single-column orchestrator report.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/charts/histogram", post(histogram_chart))
        .route("/charts/quartiles", post(quartiles_chart))
        .route("/charts/pareto", post(pareto_chart))
        .route("/charts/ranges", post(range_chart))
}

fn check_sample_size(len: usize, state: &AppState) -> Result<(), AppError> {
    if len > state.config.max_rows {
        return Err(AppError::InvalidInput(format!(
            "Sample exceeds the {} value limit",
            state.config.max_rows
        )));
    }
    Ok(())
}

#[axum::debug_handler]
async fn histogram_chart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HistogramRequest>,
) -> Result<Json<HistogramData>, AppError> {
    check_sample_size(request.values.len(), &state)?;
    Ok(Json(histogram(&request.values, request.bin_count)))
}

#[axum::debug_handler]
async fn quartiles_chart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<QuartilesRequest>,
) -> Result<Json<Quartiles>, AppError> {
    check_sample_size(request.values.len(), &state)?;
    Ok(Json(quartiles(&request.values)))
}

#[axum::debug_handler]
async fn pareto_chart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ParetoRequest>,
) -> Result<Json<Vec<ParetoPoint>>, AppError> {
    check_sample_size(request.distribution.len(), &state)?;
    Ok(Json(pareto(&request.distribution)))
}

#[axum::debug_handler]
async fn range_chart(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RangeDistributionRequest>,
) -> Result<Json<Vec<RangeBucket>>, AppError> {
    check_sample_size(request.values.len(), &state)?;
    let ranges = request
        .ranges
        .unwrap_or_else(default_currency_ranges);
    Ok(Json(range_distribution(&request.values, &ranges)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(Config {
            max_rows: 1000,
            port: 0,
        }))
    }

    #[tokio::test]
    async fn histogram_route_defaults_to_ten_bins() {
        let state = test_state();
        let body = serde_json::json!({ "values": (1..=100).map(|n| n as f64).collect::<Vec<_>>() });
        let request: HistogramRequest = serde_json::from_value(body).unwrap();

        let response = histogram_chart(State(state), Json(request)).await.unwrap();
        assert_eq!(response.0.bins.len(), 10);
    }

    #[tokio::test]
    async fn ranges_route_falls_back_to_currency_buckets() {
        let state = test_state();
        let request = RangeDistributionRequest {
            values: vec![25.0, 75.0, 2000.0],
            ranges: None,
        };

        let response = range_chart(State(state), Json(request)).await.unwrap();
        let labels: Vec<&str> = response.0.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["1-50", "51-100", "1001+"]);
    }

    #[tokio::test]
    async fn quartiles_route_flags_outliers() {
        let state = test_state();
        let request = QuartilesRequest {
            values: (1..=10).map(|n| (n * 10) as f64).chain([200.0, 300.0]).collect(),
        };

        let response = quartiles_chart(State(state), Json(request)).await.unwrap();
        assert_eq!(response.0.outliers, vec![200.0, 300.0]);
    }

    #[tokio::test]
    async fn oversized_samples_are_rejected() {
        let state = Arc::new(AppState::new(Config {
            max_rows: 2,
            port: 0,
        }));
        let request = QuartilesRequest {
            values: vec![1.0, 2.0, 3.0],
        };
        let result = quartiles_chart(State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
