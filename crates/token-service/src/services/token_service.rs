use crate::config::Config;
use crate::crypto::{self, TokenSigner, VideoGrant};
use crate::errors::TokenError;
use crate::models::{TokenRequest, TokenResponse};
use crate::observability::metrics::record_token_issuance;
use crate::observability::{hash_for_correlation, ErrorCategory};
use std::time::Instant;
use tracing::instrument;

/// Issue a room access token.
///
/// Checks run in a fixed order: the request is validated first, then the
/// signing configuration is looked up, then the signer is called. A
/// malformed request therefore never reports a configuration problem, and
/// neither failure reaches the signer. The signer call is the only await
/// point.
#[instrument(skip_all)]
pub async fn issue_token(
    config: &Config,
    signer: &dyn TokenSigner,
    request: TokenRequest,
) -> Result<TokenResponse, TokenError> {
    let start = Instant::now();
    let result = issue_token_inner(config, signer, request).await;

    match &result {
        Ok(_) => record_token_issuance("success", None, start.elapsed()),
        Err(e) => {
            let category = ErrorCategory::from(e);
            record_token_issuance("error", Some(category.as_str()), start.elapsed());
        }
    }

    result
}

async fn issue_token_inner(
    config: &Config,
    signer: &dyn TokenSigner,
    request: TokenRequest,
) -> Result<TokenResponse, TokenError> {
    let request = request.validate().inspect_err(|_| {
        tracing::debug!(target: "token.service", "Rejected token request with missing fields");
    })?;

    let credentials = config.signing_credentials().ok_or_else(|| {
        tracing::error!(
            target: "token.service",
            "Token requested but signing configuration is incomplete"
        );
        TokenError::Configuration
    })?;

    let (room_name, participant_name) = request.into_parts();
    let grant = VideoGrant::participant(room_name.as_str());

    let token = signer
        .sign(
            credentials.api_key,
            credentials.api_secret,
            &participant_name,
            &grant,
        )
        .await
        .map_err(|e| {
            let detail = crypto::scrub_secret(&e.to_string(), credentials.api_secret);
            tracing::warn!(
                target: "token.service",
                room = %room_name,
                participant = %hash_for_correlation(&participant_name),
                error = %detail,
                "Token signing failed"
            );
            TokenError::Signing(detail)
        })?;

    tracing::info!(
        target: "token.service",
        room = %room_name,
        participant = %hash_for_correlation(&participant_name),
        "Issued room token"
    );

    Ok(TokenResponse {
        token,
        server_url: credentials.server_url.to_string(),
        room_name,
        participant_name,
    })
}
