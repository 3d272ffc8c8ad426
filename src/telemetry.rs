use std::str::FromStr;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Filter directives come from `TALES_LOG`
/// and default to `info`.
pub fn init_tracing() {
    let env = std::env::var("TALES_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = EnvFilter::from_str(&env).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
