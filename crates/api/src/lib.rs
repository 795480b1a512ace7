//! Attention Monitor API Server
//!
//! WebSocket endpoint for landmark frames plus HTTP health, session and
//! metrics endpoints.

use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use monitor::{ClassifierConfig, SessionRegistry, TemporalClassifier};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub mod config;
mod error;
mod logging;
pub mod protocol;
mod routes;

pub use config::{AppConfig, LogConfig, LogFormat, MetricsConfig, ServerConfig};
pub use error::ApiError;
pub use logging::init_logging;

/// Application state shared across handlers
pub struct AppState {
    /// Live monitoring sessions
    pub registry: SessionRegistry,
    /// Loaded configuration
    pub config: AppConfig,
    /// Prometheus render handle, when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create new application state
    pub fn new(config: AppConfig, metrics: Option<PrometheusHandle>) -> Result<Self, ApiError> {
        let classifier = TemporalClassifier::new(config.classifier.clone())?;
        Ok(Self {
            registry: SessionRegistry::new(classifier),
            config,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        })
    }
}

/// Root response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub active_sessions: usize,
    pub classifier: ClassifierConfig,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/sessions", get(routes::sessions::get_sessions))
        .route("/api/v1/sessions/:id", get(routes::sessions::get_session))
        .route("/ws/monitor", get(routes::ws::monitor_ws))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(allowed)
}

async fn index_handler() -> Json<IndexResponse> {
    Json(IndexResponse {
        status: "Server is running",
        message: "Student Behavior Monitoring System API",
    })
}

/// Health check handler
async fn health_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiError> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        active_sessions: state.registry.len()?,
        classifier: state.registry.classifier().config().clone(),
    }))
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}

/// Install the global Prometheus recorder if enabled
pub fn install_metrics(config: &MetricsConfig) -> Option<PrometheusHandle> {
    if !config.enabled {
        return None;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(handle),
        Err(e) => {
            warn!("Prometheus recorder not installed: {}", e);
            None
        }
    }
}

/// Run the server until Ctrl-C
pub async fn run_server(config: AppConfig, metrics: Option<PrometheusHandle>) -> Result<(), ApiError> {
    let addr = config.server.bind_addr.clone();
    let state = Arc::new(AppState::new(config, metrics)?);
    let app = create_router(state);

    info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
