//! Attention Monitor - Main Entry Point

use api::{init_logging, install_metrics, run_server, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_logging(&config.log);

    info!("=== Attention Monitor v{} ===", env!("CARGO_PKG_VERSION"));
    info!(
        "Classifier: ear<{} for {} frames, mar>{} for {} frames, yaw>{} ({} fps)",
        config.classifier.ear_threshold,
        config.classifier.drowsy_run_threshold,
        config.classifier.mar_threshold,
        config.classifier.yawn_run_threshold,
        config.classifier.yaw_offset_threshold,
        config.classifier.frame_rate_hz,
    );

    let metrics = install_metrics(&config.metrics);
    run_server(config, metrics).await?;

    Ok(())
}
