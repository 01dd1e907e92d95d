//! Middleware module
//!
//! HTTP middleware for authentication, request logging and rate limiting

pub mod auth;
pub mod logging;
pub mod rate_limit;

pub use auth::{authenticate, CurrentUser, OptionalUser};
pub use logging::log_requests;
pub use rate_limit::{rate_limit, RateLimitConfig, RateLimiter};
