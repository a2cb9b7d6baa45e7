//! HTTP request handlers for the token service.

pub mod health;
pub mod metrics;
pub mod test_page;
pub mod token_handler;

pub use health::{health_check, readiness_check};
pub use metrics::metrics_handler;
pub use test_page::test_page;
pub use token_handler::handle_issue_token;
