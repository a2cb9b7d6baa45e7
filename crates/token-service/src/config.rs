use secrecy::SecretString;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default listening host.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Default credential lifetime (6 hours), matching the media service's own default.
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 6 * 60 * 60;

/// Upper bound for `TOKEN_TTL_SECONDS` (30 days).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 30 * 24 * 60 * 60;

/// Process-wide, read-only service configuration.
///
/// The three signing values are optional at load time: a process without them
/// still starts and serves `/health`, and `/api/token` reports a configuration
/// error per request instead.
///
/// `api_secret` is a `SecretString`, so deriving `Debug` here is safe.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_host: String,
    pub port: u16,
    /// Signing key identifier (`LIVEKIT_API_KEY`), emitted as the JWT issuer.
    pub api_key: Option<String>,
    /// HS256 signing secret (`LIVEKIT_API_SECRET`).
    pub api_secret: Option<SecretString>,
    /// Media service address (`LIVEKIT_URL`) handed back to clients.
    pub server_url: Option<String>,
    pub token_ttl_seconds: u64,
    /// `None` means any origin is allowed.
    pub cors_allowed_origins: Option<Vec<String>>,
}

/// Borrowed view of the signing configuration, only available when all
/// three values are present.
#[derive(Debug, Clone, Copy)]
pub struct SigningCredentials<'a> {
    pub api_key: &'a str,
    pub api_secret: &'a SecretString,
    pub server_url: &'a str,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT: {0}")]
    InvalidPort(String),

    #[error("Invalid TOKEN_TTL_SECONDS: {0}")]
    InvalidTokenTtl(String),
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = match vars.get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidPort(format!("'{}': {}", raw, e)))?,
            None => DEFAULT_PORT,
        };

        let bind_host = non_empty(vars, "BIND_HOST").unwrap_or_else(|| DEFAULT_BIND_HOST.to_string());

        let token_ttl_seconds = match vars.get("TOKEN_TTL_SECONDS") {
            Some(raw) => {
                let ttl = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| ConfigError::InvalidTokenTtl(format!("'{}': {}", raw, e)))?;
                if ttl == 0 || ttl > MAX_TOKEN_TTL_SECONDS {
                    return Err(ConfigError::InvalidTokenTtl(format!(
                        "{} out of range (1-{})",
                        ttl, MAX_TOKEN_TTL_SECONDS
                    )));
                }
                ttl
            }
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let cors_allowed_origins = non_empty(vars, "CORS_ALLOWED_ORIGINS").map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        Ok(Config {
            bind_host,
            port,
            api_key: non_empty(vars, "LIVEKIT_API_KEY"),
            api_secret: non_empty(vars, "LIVEKIT_API_SECRET").map(SecretString::from),
            server_url: non_empty(vars, "LIVEKIT_URL"),
            token_ttl_seconds,
            cors_allowed_origins,
        })
    }

    /// `host:port` string for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }

    /// Returns the signing values, or `None` if any of them is absent.
    pub fn signing_credentials(&self) -> Option<SigningCredentials<'_>> {
        Some(SigningCredentials {
            api_key: self.api_key.as_deref()?,
            api_secret: self.api_secret.as_ref()?,
            server_url: self.server_url.as_deref()?,
        })
    }

    pub fn is_signing_configured(&self) -> bool {
        self.signing_credentials().is_some()
    }
}

/// Blank values are treated the same as unset ones. Anything else is kept
/// byte-for-byte, since the secret and URL must match what the media server
/// holds.
fn non_empty(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .filter(|value| !value.trim().is_empty())
        .cloned()
}
