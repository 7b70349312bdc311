use std::env;

use tracing_subscriber::EnvFilter;

const DEFAULT_LEVEL: &str = "info";

/// `RUST_LOG` wins over `LOG_LEVEL`; both are optional.
fn filter_directive(rust_log: Option<String>, log_level: Option<String>) -> String {
    match rust_log.filter(|value| !value.trim().is_empty()) {
        Some(directive) => directive,
        None => log_level
            .map(|level| level.trim().to_lowercase())
            .filter(|level| !level.is_empty())
            .unwrap_or_else(|| DEFAULT_LEVEL.to_string()),
    }
}

pub fn init_logging() {
    let directive = filter_directive(env::var("RUST_LOG").ok(), env::var("LOG_LEVEL").ok());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_target(false)
        .init();
}
