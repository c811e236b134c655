//! Cyclone Prediction API Server
//!
//! HTTP surface for the prediction service: a liveness probe at `/` and
//! the predict endpoint at `/predict`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
mod rate_limit;
mod routes;

use inference_engine::PredictionEngine;

pub use rate_limit::RateLimitConfig;

/// Upper bound on request handling. Model latency is an external property,
/// so the server enforces its own limit.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across handlers.
///
/// The engine is built once from the loaded model bundle and never mutated,
/// so state is shared through a plain `Arc` with no lock.
pub struct AppState {
    /// Prediction engine backed by the model bundle
    pub engine: PredictionEngine,
    /// Version string
    pub version: String,
}

impl AppState {
    /// Create application state around a prediction engine
    pub fn new(engine: PredictionEngine) -> Self {
        Self {
            engine,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/predict", post(routes::predict::predict))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .with_state(state)
}

/// Liveness handler. Never consults the models; succeeds as soon as the
/// process is serving.
async fn home_handler(State(state): State<Arc<AppState>>) -> String {
    format!("Cyclone prediction API v{} is running", state.version)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(
    addr: &str,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let governor = rate_limit::create_governor_config(&RateLimitConfig::default());
    let app = create_router(state).layer(GovernorLayer { config: governor });

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
