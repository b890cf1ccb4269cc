//! Health check and Prometheus endpoints
//!
//! These operational routes are merged into the main API router so the
//! service exposes a single HTTP port.

use crate::metrics::collector::MetricsCollector;
use crate::service::app::AppState;
use crate::service::health::{HealthCheck, HealthStatus};
use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

/// Router with `/health`, `/alive` and `/metrics`
pub fn ops_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/alive", get(alive_handler))
        .route("/metrics", get(metrics_handler))
}

/// Readiness: reports the record store status
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Health check requested");

    match HealthCheck::check(state).await {
        Ok(health) => {
            let code = match health.status {
                HealthStatus::Healthy => StatusCode::OK,
                HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
            };
            (code, Json(json!(health)))
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": "kickabout",
                    "version": crate::VERSION,
                })),
            )
        }
    }
}

/// Liveness check endpoint handler
async fn alive_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    debug!("Liveness check requested");

    match HealthCheck::liveness_check(state).await {
        Ok(HealthStatus::Healthy) => (StatusCode::OK, "Alive"),
        _ => (StatusCode::SERVICE_UNAVAILABLE, "Not alive"),
    }
}

/// Prometheus metrics endpoint handler
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    debug!("Metrics endpoint requested");

    match render_metrics(&state.metrics()) {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TextEncoder::new().format_type().to_string())],
            output,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to encode metrics".to_string(),
            )
                .into_response()
        }
    }
}

/// Get metrics as Prometheus text format
pub fn render_metrics(metrics_collector: &MetricsCollector) -> Result<String> {
    let metric_families = metrics_collector.registry().gather();
    debug!("Serving {} metric families", metric_families.len());

    TextEncoder::new()
        .encode_to_string(&metric_families)
        .map_err(|e| anyhow::anyhow!("Failed to encode metrics: {}", e))
}
