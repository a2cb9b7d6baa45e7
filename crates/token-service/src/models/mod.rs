use crate::errors::{TokenError, VALIDATION_MESSAGE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Inbound `/api/token` body as received.
///
/// Fields are kept as raw JSON values so that a missing field, `null`, an
/// empty string and a non-string value all reach [`TokenRequest::validate`]
/// and fail the same way.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    #[serde(default)]
    pub room_name: Option<Value>,
    #[serde(default)]
    pub participant_name: Option<Value>,
}

impl TokenRequest {
    pub fn new(room_name: impl Into<String>, participant_name: impl Into<String>) -> Self {
        Self {
            room_name: Some(Value::String(room_name.into())),
            participant_name: Some(Value::String(participant_name.into())),
        }
    }

    /// Both fields must be non-empty strings.
    pub fn validate(self) -> Result<ValidatedTokenRequest, TokenError> {
        match (
            non_empty_string(self.room_name),
            non_empty_string(self.participant_name),
        ) {
            (Some(room_name), Some(participant_name)) => Ok(ValidatedTokenRequest {
                room_name,
                participant_name,
            }),
            _ => Err(TokenError::Validation(VALIDATION_MESSAGE.to_string())),
        }
    }
}

fn non_empty_string(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    }
}

/// A request that passed validation. Only produced by
/// [`TokenRequest::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTokenRequest {
    room_name: String,
    participant_name: String,
}

impl ValidatedTokenRequest {
    pub fn into_parts(self) -> (String, String) {
        (self.room_name, self.participant_name)
    }
}

/// Successful `/api/token` response.
///
/// Debug is manually implemented so the credential never reaches logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub server_url: String,
    pub room_name: String,
    pub participant_name: String,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("token", &"[REDACTED]")
            .field("server_url", &self.server_url)
            .field("room_name", &self.room_name)
            .field("participant_name", &self.participant_name)
            .finish()
    }
}

/// Liveness response for `/health`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// Readiness response for `/ready`.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub signing: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
