//! Auth, rate limiting and logging middleware.

use crate::auth::DashboardAuth;
use crate::error::DashboardError;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};
use tracing::{debug, warn};

/// Global rate limiter (not keyed by client).
pub type GlobalLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter state shared across requests.
#[derive(Clone)]
pub struct RateLimitState {
    pub global: Arc<GlobalLimiter>,
    quota: Quota,
}

impl RateLimitState {
    /// Allow `requests_per_minute` across all clients (zero falls back to 60).
    pub fn new(requests_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(requests_per_minute)
            .unwrap_or(NonZeroU32::MIN.saturating_add(59));
        let quota = Quota::per_minute(per_minute);

        Self {
            global: Arc::new(RateLimiter::direct(quota)),
            quota,
        }
    }

    /// A limiter with the same quota and its own budget.
    pub fn independent(&self) -> Self {
        Self {
            global: Arc::new(RateLimiter::direct(self.quota)),
            quota: self.quota,
        }
    }

    /// Create a permissive rate limiter for testing.
    pub fn permissive() -> Self {
        Self::new(1000)
    }
}

/// Reject requests over the global limit with 429.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, DashboardError> {
    if rate_limit.global.check().is_err() {
        warn!("Global rate limit exceeded");
        return Err(DashboardError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}

/// Require valid HTTP Basic credentials.
///
/// bcrypt is CPU-bound, so the check runs on the blocking pool.
pub async fn auth_middleware(
    State(auth): State<Arc<DashboardAuth>>,
    request: Request,
    next: Next,
) -> Result<Response, DashboardError> {
    let Some(header) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
    else {
        debug!(uri = %request.uri(), "Rejected request without credentials");
        return Err(DashboardError::Unauthorized);
    };

    let authorized = tokio::task::spawn_blocking(move || auth.verify_header(&header))
        .await
        .map_err(|e| DashboardError::Internal(format!("credential check aborted: {}", e)))?
        .map_err(|e| DashboardError::Internal(format!("invalid stored password hash: {}", e)))?;

    if !authorized {
        debug!(uri = %request.uri(), "Rejected request with invalid credentials");
        return Err(DashboardError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Logging middleware for requests.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    debug!(%method, %uri, "Request started");

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    if status.is_success() {
        debug!(%method, %uri, %status, ?duration, "Request completed");
    } else {
        warn!(%method, %uri, %status, ?duration, "Request failed");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_exhaustion() {
        let state = RateLimitState::new(1);

        assert!(state.global.check().is_ok());
        assert!(state.global.check().is_err());
    }

    #[test]
    fn test_zero_limit_falls_back() {
        let state = RateLimitState::new(0);
        for _ in 0..60 {
            assert!(state.global.check().is_ok());
        }
        assert!(state.global.check().is_err());
    }

    #[test]
    fn test_independent_budget() {
        let state = RateLimitState::new(1);
        let other = state.independent();

        assert!(state.global.check().is_ok());
        assert!(state.global.check().is_err());
        // Same quota, untouched budget
        assert!(other.global.check().is_ok());
        assert!(other.global.check().is_err());
    }

    #[test]
    fn test_permissive_rate_limit() {
        let state = RateLimitState::permissive();
        for _ in 0..100 {
            assert!(state.global.check().is_ok());
        }
    }
}
