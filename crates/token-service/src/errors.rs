use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for every validation failure.
pub const VALIDATION_MESSAGE: &str = "roomName and participantName are required";

/// Errors surfaced by the token issuance endpoint.
///
/// Variants are listed in check order: a request is validated before the
/// configuration is consulted, and the configuration before signing.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid request: {0}")]
    Validation(String),

    /// One or more signing values are absent. Carries no detail about which.
    #[error("Signing configuration is incomplete")]
    Configuration,

    /// Detail has already been scrubbed of the signing secret.
    #[error("Token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let (status, error, details) = match self {
            TokenError::Validation(message) => (StatusCode::BAD_REQUEST, message, None),
            TokenError::Configuration => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error".to_string(),
                None,
            ),
            TokenError::Signing(detail) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate token".to_string(),
                Some(detail),
            ),
        };

        (status, Json(ErrorResponse { error, details })).into_response()
    }
}
