use tracing_subscriber::EnvFilter;

/// Initialize tracing from LOG_LEVEL (falling back to RUST_LOG, then
/// "info"). LOG_JSON=true switches to structured output.
pub fn setup_logging() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("LOG_JSON")
        .map(|value| value == "true" || value == "1")
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}
