//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for issued room tokens.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use token_service::crypto::verify_access_token;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// JWT claims structure, decoded loosely so assertions can report what is
/// actually present.
#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub name: String,
    pub nbf: i64,
    pub exp: i64,
    pub video: serde_json::Value,
}

fn decode_part<T: DeserializeOwned>(token: &str, index: usize, what: &str) -> T {
    let part = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT has no {} segment", what));
    let bytes = URL_SAFE_NO_PAD
        .decode(part)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT {}: {:?}", what, e));
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("Failed to parse JWT {} JSON: {:?}", what, e))
}

/// Custom assertions for issued tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_issued_by("APIkey")
///     .assert_room_grant("test-room");
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a well-formed HS256 JWT with access claims
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token's issuer is the given API key
    fn assert_issued_by(&self, api_key: &str) -> &Self;

    /// Assert that subject and display name both equal the identity
    fn assert_for_identity(&self, identity: &str) -> &Self;

    /// Assert that the grant is exactly the standard participant grant for `room`
    fn assert_room_grant(&self, room: &str) -> &Self;

    /// Assert that the token expires within the specified seconds
    fn assert_expires_in(&self, seconds: u64) -> &Self;

    /// Assert that the signature verifies with the given secret
    fn assert_verifies_with(&self, api_secret: &str) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header: JwtHeader = decode_part(self, 0, "header");
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let _claims: JwtClaims = decode_part(self, 1, "payload");

        self
    }

    fn assert_issued_by(&self, api_key: &str) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert_eq!(
            claims.iss, api_key,
            "Expected issuer '{}', got '{}'",
            api_key, claims.iss
        );

        self
    }

    fn assert_for_identity(&self, identity: &str) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        assert_eq!(
            claims.sub, identity,
            "Expected subject '{}', got '{}'",
            identity, claims.sub
        );
        assert_eq!(
            claims.name, identity,
            "Expected name '{}', got '{}'",
            identity, claims.name
        );

        self
    }

    fn assert_room_grant(&self, room: &str) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");
        let expected = serde_json::json!({
            "roomJoin": true,
            "room": room,
            "canPublish": true,
            "canSubscribe": true,
            "canUpdateOwnMetadata": true,
        });

        assert_eq!(
            claims.video, expected,
            "Grant does not match the standard participant grant"
        );

        self
    }

    fn assert_expires_in(&self, seconds: u64) -> &Self {
        let claims: JwtClaims = decode_part(self, 1, "payload");

        let now = chrono::Utc::now().timestamp();
        let expires_in = claims.exp - now;

        // Allow 5-second tolerance for clock skew
        assert!(
            (expires_in - seconds as i64).abs() <= 5,
            "Expected token to expire in {} seconds, but expires in {} seconds",
            seconds,
            expires_in
        );
        assert!(claims.nbf <= now, "Token should already be valid");

        self
    }

    fn assert_verifies_with(&self, api_secret: &str) -> &Self {
        let result = verify_access_token(self, &SecretString::from(api_secret));
        assert!(
            result.is_ok(),
            "Token failed verification: {:?}",
            result.err()
        );

        self
    }
}
