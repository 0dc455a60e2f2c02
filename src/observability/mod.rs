//! Observability
//!
//! Structured logging setup and health endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::config::config::LoggingConfig;

pub const WELCOME_MESSAGE: &str = "Welcome to D&D Character Builder API";

// ===== Structured Logging =====

/// Install the global tracing subscriber. `RUST_LOG` overrides the
/// configured level.
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},tower_http=info", config.level)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    let result = if config.structured {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {e}");
    }
}

// ===== Health Check =====

/// Overall health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: f64,
    pub checks: Vec<HealthCheck>,
}

/// A single health check
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: String,
    pub message: Option<String>,
}

/// State for the health endpoints
#[derive(Debug, Clone)]
pub struct ObservabilityState {
    pub storage_root: PathBuf,
    pub start_time: DateTime<Utc>,
    pub version: String,
}

impl ObservabilityState {
    pub fn new(storage_root: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            storage_root: storage_root.into(),
            start_time: Utc::now(),
            version: version.into(),
        }
    }

    pub fn uptime_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_seconds() as f64
    }

    async fn check_storage(&self) -> HealthCheck {
        let (healthy, message) = match tokio::fs::metadata(&self.storage_root).await {
            Ok(meta) if meta.is_dir() => (true, "storage directory accessible".to_string()),
            Ok(_) => (false, "storage root is not a directory".to_string()),
            Err(e) => (false, e.to_string()),
        };
        HealthCheck {
            name: "storage".to_string(),
            status: status_label(healthy).to_string(),
            message: Some(message),
        }
    }
}

fn status_label(healthy: bool) -> &'static str {
    if healthy { "healthy" } else { "unhealthy" }
}

/// Full health status
pub async fn health_check(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    let checks = vec![state.check_storage().await];
    let all_healthy = checks.iter().all(|c| c.status == "healthy");

    let health_status = HealthStatus {
        status: status_label(all_healthy).to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.uptime_seconds(),
        checks,
    };

    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health_status))
}

/// Liveness probe
pub async fn liveness() -> impl IntoResponse {
    "OK"
}

/// Version information
pub async fn version(State(state): State<Arc<ObservabilityState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "version": state.version,
        "uptime_seconds": state.uptime_seconds(),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// API root greeting
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({ "message": WELCOME_MESSAGE }))
}

/// Create the observability router
pub fn create_observability_router(state: Arc<ObservabilityState>) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
        .route("/version", get(version))
        .with_state(state)
}
