//! Health check handlers.
//!
//! - `/health`: Liveness probe - always OK while the process serves HTTP
//! - `/ready`: Readiness probe - OK only when tokens can be issued

use crate::models::{HealthResponse, ReadinessResponse};
use crate::observability::metrics::record_readiness_check;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use std::sync::Arc;

/// Liveness probe handler.
///
/// Does not look at the signing configuration.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "Token server is running",
    })
}

/// Readiness probe handler.
///
/// Returns 200 when all signing values are configured, 503 otherwise. The
/// response never says which value is missing; that is logged server-side.
#[tracing::instrument(skip_all, name = "token.health.readiness")]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    if !state.config.is_signing_configured() {
        tracing::warn!(
            api_key_set = state.config.api_key.is_some(),
            api_secret_set = state.config.api_secret.is_some(),
            server_url_set = state.config.server_url.is_some(),
            "Readiness check failed: signing configuration incomplete"
        );
        record_readiness_check("not_ready");
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready",
                signing: "unconfigured",
                error: Some("Service dependencies unavailable".to_string()),
            }),
        );
    }

    record_readiness_check("ready");
    (
        StatusCode::OK,
        Json(ReadinessResponse {
            status: "ready",
            signing: "configured",
            error: None,
        }),
    )
}
