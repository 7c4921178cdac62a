use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;

fn default_max_rows() -> usize {
    50_000
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub max_rows: usize,
    pub port: u16,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let max_rows = match std::env::var("SHEET_STATS_MAX_ROWS") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid SHEET_STATS_MAX_ROWS: {}", e))?,
            Err(_) => default_max_rows(),
        };
        let port = match std::env::var("SHEET_STATS_PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid SHEET_STATS_PORT: {}", e))?,
            Err(_) => default_port(),
        };

        Ok(Config { max_rows, port })
    }
}
