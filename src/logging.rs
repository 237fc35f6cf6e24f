use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "feedback_store=info";

/// Installs a fmt subscriber filtered by `RUST_LOG`, e.g.
/// `RUST_LOG=feedback_store=debug`. Later calls leave the first subscriber in place.
pub fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();
}
