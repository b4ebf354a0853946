use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LEVEL: &str = "info";

fn filter_for(level: Option<&str>) -> (EnvFilter, Option<String>) {
    let Some(raw) = level.map(str::trim).filter(|v| !v.is_empty()) else {
        return (EnvFilter::new(DEFAULT_LEVEL), None);
    };
    match EnvFilter::try_new(raw.to_ascii_lowercase()) {
        Ok(filter) => (filter, None),
        Err(_) => (EnvFilter::new(DEFAULT_LEVEL), Some(raw.to_string())),
    }
}

/// Installs the stderr subscriber. `LOG_LEVEL` accepts any `EnvFilter`
/// directive; anything unparseable falls back to `info` with a warning.
pub fn init(level: Option<&str>) {
    let (filter, rejected) = filter_for(level);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();

    if let Some(raw) = rejected {
        tracing::warn!(level = %raw, "invalid LOG_LEVEL, using default `{DEFAULT_LEVEL}`");
    }
}
