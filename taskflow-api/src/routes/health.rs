/// Health endpoints
///
/// ```text
/// GET /         -> "API is running..."
/// GET /health   -> { "status": "healthy", "version": "0.1.0", "database": "connected" }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`
    pub status: String,

    /// Application version
    pub version: String,

    /// `connected` or `disconnected`
    pub database: String,

    /// Store backend in use (`postgres` or `memory`)
    pub backend: String,
}

/// Plain-text liveness banner
pub async fn root() -> &'static str {
    "API is running..."
}

/// Reports whether the store answers
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Store health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
        backend: state.store.backend().to_string(),
    })
}
