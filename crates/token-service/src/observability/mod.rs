//! Observability for the token service.
//!
//! # Privacy by Default
//!
//! Handlers and services use `#[instrument(skip_all)]` and allow-list the
//! fields they record. Fields fall into three groups:
//! - **SAFE**: logged in plaintext (room name, error category, status)
//! - **HASHED**: logged via [`hash_for_correlation`] (participant name)
//! - **NEVER**: the API secret and issued tokens

pub mod metrics;

use crate::errors::TokenError;
use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Lets operators follow one participant across log lines without the name
/// itself appearing in them.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    // 4 bytes → 8 hex chars
    hex::encode(digest.get(..4).unwrap_or_default())
}

/// Error categories for metrics labels (bounded cardinality)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or malformed request fields
    Validation,
    /// Signing values absent from the process configuration
    Configuration,
    /// The signer rejected the input or failed
    Signing,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::Signing => "signing",
        }
    }
}

impl From<&TokenError> for ErrorCategory {
    fn from(err: &TokenError) -> Self {
        match err {
            TokenError::Validation(_) => ErrorCategory::Validation,
            TokenError::Configuration => ErrorCategory::Configuration,
            TokenError::Signing(_) => ErrorCategory::Signing,
        }
    }
}
