use crate::errors::TokenError;
use crate::models::{TokenRequest, TokenResponse};
use crate::routes::AppState;
use crate::services::token_service;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

/// Handle room token request
///
/// POST /api/token
///
/// A body that cannot be read as a JSON object (bad JSON, wrong content type,
/// an array or scalar) is treated as a request with no fields, so it fails
/// validation with the same 400 response as a missing field.
#[tracing::instrument(skip_all, name = "token.handler.issue")]
pub async fn handle_issue_token(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TokenResponse>, TokenError> {
    let request = match payload {
        // Serde would also accept a positional array for a struct
        Ok(Json(body)) if body.is_object() => {
            serde_json::from_value::<TokenRequest>(body).unwrap_or_default()
        }
        Ok(Json(_)) => {
            tracing::debug!(target: "token.handler", "Token request body is not an object");
            TokenRequest::default()
        }
        Err(rejection) => {
            tracing::debug!(
                target: "token.handler",
                status = %rejection.status(),
                "Unreadable token request body"
            );
            TokenRequest::default()
        }
    };

    let response =
        token_service::issue_token(&state.config, state.signer.as_ref(), request).await?;

    Ok(Json(response))
}
