use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter applied when RUST_LOG is unset: this crate at info, plus the HTTP
/// trace layer so request spans show up out of the box.
fn default_filter() -> EnvFilter {
    EnvFilter::new("sheet_stats=info,tower_http=info")
}

pub fn init_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_targets_this_crate() {
        let rendered = default_filter().to_string();
        assert!(rendered.contains("sheet_stats=info"));
        assert!(rendered.contains("tower_http=info"));
    }
}
