//! Room Token Service Library
//!
//! Issues signed access tokens that let a client join a room on an external
//! real-time media service. The service validates a room name and participant
//! name, signs a credential carrying a fixed participant grant, and returns it
//! together with the media server address.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Access token claims and signing
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `models` - Request and response types
//! - `observability` - Log hashing and metrics
//! - `routes` - Router and application state
//! - `services` - Token issuance

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod routes;
pub mod services;
