//! Cyclone Prediction Service - Main Entry Point

use std::sync::Arc;

use api::config::Settings;
use api::{init_logging, run_server, AppState};
use inference_engine::{ModelBundle, PredictionEngine};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    info!("=== Cyclone Prediction Service v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load()?;

    // The bundle is read exactly once; a missing or malformed artifact
    // aborts startup before the listener binds.
    let bundle = ModelBundle::load(&settings.model_dir)?;
    let engine = PredictionEngine::from_bundle(bundle);
    let state = Arc::new(AppState::new(engine));

    run_server(&settings.bind_addr(), state).await?;

    Ok(())
}
