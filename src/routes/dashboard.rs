use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use axum::{extract::State, http::Method, routing::post, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    error::AppError,
    models::{AnalyzeDashboardRequest, ColumnStatisticsRequest},
    services::stats::{analyze_for_dashboard, column_statistics, types::ColumnStatistics},
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/dashboard/analyze", post(analyze_dashboard))
        .route("/columns/statistics", post(analyze_columns))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn cache_key(request: &AnalyzeDashboardRequest) -> Result<u64, AppError> {
    let serialized = serde_json::to_string(request)?;
    let mut hasher = DefaultHasher::new();
    serialized.hash(&mut hasher);
    Ok(hasher.finish())
}

#[axum::debug_handler]
async fn analyze_dashboard(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeDashboardRequest>,
) -> Result<Json<crate::services::stats::DashboardAnalysis>, AppError> {
    let start = std::time::Instant::now();
    tracing::info!(
        "Starting dashboard analysis for {} rows, name column: {:?}",
        request.rows.len(),
        request.name_column
    );

    if request.rows.len() > state.config.max_rows {
        tracing::error!(
            "Request of {} rows exceeds limit of {}",
            request.rows.len(),
            state.config.max_rows
        );
        return Err(AppError::InvalidInput(format!(
            "Table exceeds the {} row limit",
            state.config.max_rows
        )));
    }

    let key = cache_key(&request)?;
    if let Some(cached) = state.analysis_cache.get(&key) {
        tracing::info!("Serving cached analysis in {:?}", start.elapsed());
        return Ok(Json((*cached).clone()));
    }

    let analysis_start = std::time::Instant::now();
    let analysis = analyze_for_dashboard(
        &request.rows,
        &request.column_labels,
        request.name_column.as_deref(),
    );
    tracing::info!(
        "Analysis completed in {:?}: {} numeric columns, {} date columns",
        analysis_start.elapsed(),
        analysis.numeric_columns.len(),
        analysis.date_columns.len()
    );

    state.analysis_cache.insert(key, Arc::new(analysis.clone()));
    tracing::info!("Total processing completed in {:?}", start.elapsed());

    Ok(Json(analysis))
}

#[axum::debug_handler]
async fn analyze_columns(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ColumnStatisticsRequest>,
) -> Result<Json<Vec<ColumnStatistics>>, AppError> {
    if request.rows.len() > state.config.max_rows {
        return Err(AppError::InvalidInput(format!(
            "Table exceeds the {} row limit",
            state.config.max_rows
        )));
    }
    if request.columns.is_empty() {
        return Err(AppError::InvalidInput("No columns selected".to_string()));
    }

    let start = std::time::Instant::now();
    let stats: Vec<ColumnStatistics> = request
        .columns
        .iter()
        .map(|col| {
            let label = col.label.as_deref().unwrap_or(col.key.as_str());
            column_statistics(&request.rows, &col.key, label)
        })
        .collect();
    tracing::info!(
        "Computed statistics for {} columns in {:?}",
        stats.len(),
        start.elapsed()
    );

    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::stats::types::CellValue;
    use indexmap::IndexMap;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState::new(Config {
            max_rows: 100,
            port: 0,
        }))
    }

    fn request_with_rows(n: usize) -> AnalyzeDashboardRequest {
        let rows = (0..n)
            .map(|i| {
                let mut row = IndexMap::new();
                row.insert("amount".to_string(), CellValue::Number(i as f64));
                row
            })
            .collect();
        AnalyzeDashboardRequest {
            rows,
            column_labels: Default::default(),
            name_column: None,
        }
    }

    #[tokio::test]
    async fn analyze_handler_returns_report() {
        let state = test_state();
        let response = analyze_dashboard(State(state), Json(request_with_rows(10)))
            .await
            .expect("analysis succeeds");
        assert_eq!(response.0.total_rows, 10);
        assert_eq!(response.0.numeric_columns, vec!["amount".to_string()]);
    }

    #[tokio::test]
    async fn analyze_handler_rejects_oversized_tables() {
        let state = test_state();
        let result = analyze_dashboard(State(state), Json(request_with_rows(101))).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn repeated_requests_hit_the_cache() {
        let state = test_state();
        let request = request_with_rows(5);
        let key = cache_key(&request).unwrap();

        assert!(state.analysis_cache.get(&key).is_none());
        analyze_dashboard(State(state.clone()), Json(request.clone()))
            .await
            .unwrap();
        assert!(state.analysis_cache.get(&key).is_some());

        let cached = analyze_dashboard(State(state), Json(request)).await.unwrap();
        assert_eq!(cached.0.total_rows, 5);
    }

    #[tokio::test]
    async fn column_statistics_handler_uses_selected_labels() {
        let state = test_state();
        let mut row = IndexMap::new();
        row.insert("amt".to_string(), CellValue::Number(12.0));
        let request = ColumnStatisticsRequest {
            rows: vec![row],
            columns: vec![crate::models::ColumnSelection {
                key: "amt".to_string(),
                label: Some("Amount".to_string()),
            }],
        };

        let response = analyze_columns(State(state), Json(request)).await.unwrap();
        assert_eq!(response.0[0].label, "Amount");
        assert_eq!(response.0[0].sum, 12.0);
    }

    #[tokio::test]
    async fn column_statistics_handler_rejects_empty_selection() {
        let state = test_state();
        let request = ColumnStatisticsRequest {
            rows: Vec::new(),
            columns: Vec::new(),
        };
        let result = analyze_columns(State(state), Json(request)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
