//! Access token claims and signing.
//!
//! The credential format is the media service's access token: an HS256 JWT
//! whose issuer is the API key, whose subject is the participant identity,
//! and whose `video` claim carries the room grant.
//!
//! Signing sits behind the [`TokenSigner`] trait so the issuance flow can be
//! exercised with [`mock::MockSigner`] without producing real tokens.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::instrument;

/// Replacement text for secret material found in error details.
const REDACTED: &str = "[REDACTED]";

/// Room grant embedded in every issued credential.
///
/// The capability set is fixed: join, publish, subscribe and update own
/// metadata. The only way to build one is [`VideoGrant::participant`], so no
/// request field can widen or narrow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    room_join: bool,
    room: String,
    can_publish: bool,
    can_subscribe: bool,
    can_update_own_metadata: bool,
}

impl VideoGrant {
    /// Standard participant grant scoped to `room`.
    pub fn participant(room: impl Into<String>) -> Self {
        Self {
            room_join: true,
            room: room.into(),
            can_publish: true,
            can_subscribe: true,
            can_update_own_metadata: true,
        }
    }

    pub fn room(&self) -> &str {
        &self.room
    }

    pub fn room_join(&self) -> bool {
        self.room_join
    }

    pub fn can_publish(&self) -> bool {
        self.can_publish
    }

    pub fn can_subscribe(&self) -> bool {
        self.can_subscribe
    }

    pub fn can_update_own_metadata(&self) -> bool {
        self.can_update_own_metadata
    }
}

/// JWT payload of an access token.
///
/// `sub`, `name` and `jti` all hold the participant identity, which is a
/// user-chosen value. The custom Debug implementation redacts them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub iss: String, // API key
    pub sub: String, // Participant identity
    pub name: String,
    pub jti: String,
    pub nbf: i64,
    pub exp: i64,
    pub video: VideoGrant,
}

impl fmt::Debug for AccessClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessClaims")
            .field("iss", &self.iss)
            .field("sub", &"[REDACTED]")
            .field("name", &"[REDACTED]")
            .field("jti", &"[REDACTED]")
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .field("video", &self.video)
            .finish()
    }
}

/// Failure raised by a signer.
#[derive(Debug, Error)]
pub enum SigningFailure {
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Invalid token lifetime: {0}")]
    InvalidLifetime(String),

    #[error("JWT signing operation failed: {0}")]
    Encoding(String),

    #[error("JWT verification failed: {0}")]
    Verification(String),
}

/// Signing capability: turns key id, secret, identity and grant into a
/// credential string.
///
/// The identity is used both as the unique participant identity and as the
/// display name.
#[async_trait::async_trait]
pub trait TokenSigner: Send + Sync {
    async fn sign(
        &self,
        api_key: &str,
        api_secret: &SecretString,
        identity: &str,
        grant: &VideoGrant,
    ) -> Result<String, SigningFailure>;
}

/// HS256 access token signer backed by `jsonwebtoken`.
#[derive(Debug, Clone)]
pub struct JwtSigner {
    ttl_seconds: u64,
}

impl JwtSigner {
    pub fn new(ttl_seconds: u64) -> Self {
        Self { ttl_seconds }
    }

    /// Build the claims for a token issued now.
    pub fn build_claims(
        &self,
        api_key: &str,
        identity: &str,
        grant: &VideoGrant,
    ) -> Result<AccessClaims, SigningFailure> {
        let ttl = i64::try_from(self.ttl_seconds)
            .map_err(|_| SigningFailure::InvalidLifetime(format!("{}s", self.ttl_seconds)))?;
        let now = Utc::now().timestamp();
        let exp = now
            .checked_add(ttl)
            .ok_or_else(|| SigningFailure::InvalidLifetime(format!("{}s", self.ttl_seconds)))?;

        Ok(AccessClaims {
            iss: api_key.to_string(),
            sub: identity.to_string(),
            name: identity.to_string(),
            jti: identity.to_string(),
            nbf: now,
            exp,
            video: grant.clone(),
        })
    }
}

#[async_trait::async_trait]
impl TokenSigner for JwtSigner {
    #[instrument(skip_all)]
    async fn sign(
        &self,
        api_key: &str,
        api_secret: &SecretString,
        identity: &str,
        grant: &VideoGrant,
    ) -> Result<String, SigningFailure> {
        if api_key.is_empty() {
            return Err(SigningFailure::InvalidKey("API key is empty".to_string()));
        }
        if api_secret.expose_secret().is_empty() {
            return Err(SigningFailure::InvalidKey("API secret is empty".to_string()));
        }

        let claims = self.build_claims(api_key, identity, grant)?;

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        let encoding_key = EncodingKey::from_secret(api_secret.expose_secret().as_bytes());

        encode(&header, &claims, &encoding_key)
            .map_err(|e| SigningFailure::Encoding(e.to_string()))
    }
}

/// Verify an access token's HS256 signature and time claims, returning its
/// claims.
#[instrument(skip_all)]
pub fn verify_access_token(
    token: &str,
    api_secret: &SecretString,
) -> Result<AccessClaims, SigningFailure> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_nbf = true;
    validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub"]);

    let decoding_key = DecodingKey::from_secret(api_secret.expose_secret().as_bytes());

    decode::<AccessClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| SigningFailure::Verification(e.to_string()))
}

/// Remove any occurrence of the secret from a failure message.
pub fn scrub_secret(detail: &str, api_secret: &SecretString) -> String {
    let secret = api_secret.expose_secret();
    if secret.is_empty() {
        return detail.to_string();
    }
    detail.replace(secret, REDACTED)
}

/// Mock signer for tests.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Arguments captured from the most recent `sign` call. The secret is
    /// never captured.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct SignCall {
        pub api_key: String,
        pub identity: String,
        pub grant: VideoGrant,
    }

    /// Signer that returns canned tokens or a canned failure and counts calls.
    pub struct MockSigner {
        failure: Option<String>,
        call_count: AtomicUsize,
        last_call: Mutex<Option<SignCall>>,
    }

    impl MockSigner {
        /// Returns `mock-token-<n>` for the n-th call.
        pub fn succeeding() -> Self {
            Self {
                failure: None,
                call_count: AtomicUsize::new(0),
                last_call: Mutex::new(None),
            }
        }

        /// Always fails with `SigningFailure::Encoding(message)`.
        pub fn failing(message: impl Into<String>) -> Self {
            Self {
                failure: Some(message.into()),
                call_count: AtomicUsize::new(0),
                last_call: Mutex::new(None),
            }
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn last_call(&self) -> Option<SignCall> {
            self.last_call.lock().ok().and_then(|guard| guard.clone())
        }
    }

    #[async_trait::async_trait]
    impl TokenSigner for MockSigner {
        async fn sign(
            &self,
            api_key: &str,
            _api_secret: &SecretString,
            identity: &str,
            grant: &VideoGrant,
        ) -> Result<String, SigningFailure> {
            let count = self.call_count.fetch_add(1, Ordering::SeqCst);

            if let Ok(mut guard) = self.last_call.lock() {
                *guard = Some(SignCall {
                    api_key: api_key.to_string(),
                    identity: identity.to_string(),
                    grant: grant.clone(),
                });
            }

            match &self.failure {
                Some(message) => Err(SigningFailure::Encoding(message.clone())),
                None => Ok(format!("mock-token-{}", count + 1)),
            }
        }
    }

}
