//! # Token Test Utilities
//!
//! Shared test utilities for the room token service.
//!
//! This crate provides:
//! - Fixed configuration fixtures (API key, secret, media URL)
//! - Server test harness (TestTokenServer for E2E tests)
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use token_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestTokenServer::spawn().await?;
//!     let token = server.request_token("test-room", "TestUser").await?;
//!
//!     token
//!         .assert_valid_jwt()
//!         .assert_for_identity("TestUser")
//!         .assert_room_grant("test-room");
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod fixtures;
pub mod server_harness;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
pub use server_harness::*;
