//! Rate limiting middleware
//!
//! This module provides rate limiting functionality to prevent abuse and
//! ensure fair usage of the API. Anonymous requests are not limited here;
//! the limiter keys on the authenticated user id, so it must run after the
//! authentication middleware.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::warn;

use crate::handlers::AppState;
use crate::services::auth::AuthContext;
use crate::utils::errors::{AppError, Result};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
    /// Burst allowance (extra requests allowed in short bursts)
    pub burst_allowance: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window_duration: Duration::from_secs(60),
            burst_allowance: 5,
        }
    }
}

impl RateLimitConfig {
    pub fn from_settings(settings: &crate::config::Settings) -> Self {
        Self {
            max_requests: settings.limits.rate_limit_per_minute,
            ..Self::default()
        }
    }
}

/// Rate limit entry for tracking user requests
#[derive(Debug, Clone)]
struct RateLimitEntry {
    requests: Vec<Instant>,
    burst_used: u32,
    last_reset: Instant,
}

impl RateLimitEntry {
    fn new() -> Self {
        Self {
            requests: Vec::new(),
            burst_used: 0,
            last_reset: Instant::now(),
        }
    }

    /// Clean up old requests outside the window
    fn cleanup(&mut self, window_duration: Duration) {
        let cutoff = Instant::now() - window_duration;
        self.requests.retain(|&time| time > cutoff);

        if self.last_reset.elapsed() > window_duration {
            self.burst_used = 0;
            self.last_reset = Instant::now();
        }
    }

    /// Check if request is allowed
    fn is_allowed(&mut self, config: &RateLimitConfig) -> bool {
        self.cleanup(config.window_duration);

        let current_requests = self.requests.len() as u32;

        if current_requests < config.max_requests {
            return true;
        }

        if self.burst_used < config.burst_allowance {
            self.burst_used += 1;
            return true;
        }

        false
    }

    /// Record a new request
    fn record_request(&mut self) {
        self.requests.push(Instant::now());
    }
}

/// Sliding-window rate limiter keyed by user id
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    entries: Mutex<HashMap<i64, RateLimitEntry>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Check and record a request for a user
    pub fn check(&self, user_id: i64) -> Result<()> {
        let mut entries = self.entries.lock().expect("rate limiter lock poisoned");
        let entry = entries.entry(user_id).or_insert_with(RateLimitEntry::new);

        if entry.is_allowed(&self.config) {
            entry.record_request();
            Ok(())
        } else {
            warn!(user_id = user_id, "Rate limit exceeded");
            Err(AppError::RateLimitExceeded)
        }
    }

    /// Drop entries that have gone quiet for a full window
    pub fn cleanup_stale(&self) {
        let mut entries = self.entries.lock().expect("rate limiter lock poisoned");
        entries.retain(|_, entry| {
            entry.cleanup(self.config.window_duration);
            !entry.requests.is_empty() || entry.burst_used > 0
        });
    }
}

/// Rate limiting middleware for authenticated requests
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response> {
    if let Some(context) = request.extensions().get::<AuthContext>() {
        state.rate_limiter.check(context.user_id)?;
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight_config() -> RateLimitConfig {
        RateLimitConfig {
            max_requests: 2,
            window_duration: Duration::from_secs(60),
            burst_allowance: 1,
        }
    }

    #[test]
    fn test_requests_within_limit_pass() {
        let limiter = RateLimiter::new(tight_config());
        assert!(limiter.check(1).is_ok());
        assert!(limiter.check(1).is_ok());
    }

    #[test]
    fn test_burst_then_rejection() {
        let limiter = RateLimiter::new(tight_config());
        assert!(limiter.check(1).is_ok());
        assert!(limiter.check(1).is_ok());
        // Burst allowance absorbs one more, then the limit bites.
        assert!(limiter.check(1).is_ok());
        assert!(limiter.check(1).is_err());
    }

    #[test]
    fn test_users_are_limited_independently() {
        let limiter = RateLimiter::new(tight_config());
        for _ in 0..3 {
            let _ = limiter.check(1);
        }
        assert!(limiter.check(1).is_err());
        assert!(limiter.check(2).is_ok());
    }

    #[test]
    fn test_cleanup_drops_idle_entries() {
        let limiter = RateLimiter::new(RateLimitConfig {
            max_requests: 2,
            window_duration: Duration::from_millis(0),
            burst_allowance: 0,
        });
        let _ = limiter.check(1);
        limiter.cleanup_stale();
        let entries = limiter.entries.lock().unwrap();
        assert!(entries.is_empty());
    }
}
