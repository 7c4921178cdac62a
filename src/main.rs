use anyhow::Result;
use axum::Router;
use moka::sync::Cache;
use std::net::SocketAddr;
use std::sync::Arc;

use crate::services::stats::DashboardAnalysis;

mod config;
mod error;
mod logging;
mod routes;
mod services;
pub mod models;

const ANALYSIS_CACHE_CAPACITY: u64 = 64;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    logging::init_logging()?;

    // Load configuration
    let config = config::Config::new()?;
    let port = config.port;

    // Build our application state
    let state = Arc::new(AppState::new(config));

    // Build our application with a route
    let app = Router::new()
        .merge(routes::routes())
        .merge(routes::dashboard::routes())
        .merge(routes::charts::routes())
        .with_state(state);

    // Run it
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Application state
pub struct AppState {
    config: config::Config,
    /// Memoized dashboard reports keyed by request hash. The engine itself is
    /// pure and stateless; caching lives out here at the service boundary.
    analysis_cache: Cache<u64, Arc<DashboardAnalysis>>,
}

impl AppState {
    fn new(config: config::Config) -> Self {
        Self {
            config,
            analysis_cache: Cache::new(ANALYSIS_CACHE_CAPACITY),
        }
    }
}
