//! Observability HTTP Routes
//!
//! Health check and counters.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::core::FormService;
use crate::observability::MetricsSnapshot;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Create observability routes
pub fn observability_routes(service: Arc<FormService>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(service)
}

/// Health check route at the root
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

async fn metrics_handler(State(service): State<Arc<FormService>>) -> Json<MetricsSnapshot> {
    Json(service.metrics().snapshot())
}
