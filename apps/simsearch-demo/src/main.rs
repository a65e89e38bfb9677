use simsearch_demo::{run, DemoConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (RUST_LOG overrides the default level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Parse CLI args for config file path
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "simsearch.yaml".to_string());

    tracing::info!("Loading configuration from: {}", config_path);

    // Load configuration (try file first, fall back to env)
    let config = if std::path::Path::new(&config_path).exists() {
        DemoConfig::load_from_file(&config_path)?
    } else {
        tracing::warn!("Config file not found, loading from environment variables");
        DemoConfig::load_from_env()?
    };

    let report = match run(&config) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Self-check failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Verified top-{} rankings over {} candidates ({} dimensions) for {} metric(s)",
        report.k,
        report.candidates,
        report.dimensions,
        report.metrics.len()
    );
    Ok(())
}
