//! Request middleware: the roster-change quota and request logging.

use crate::error::ServiceError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc, time::Instant};
use tracing::{debug, warn};

/// Signups and unregisters allowed per minute across all clients.
pub const DEFAULT_ROSTER_CHANGES_PER_MINUTE: u32 = 600;

type RosterLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared quota on roster changes.
///
/// Only signup and unregister draw from it; listing activities never does.
/// A limit of zero turns the quota off.
#[derive(Clone)]
pub struct RateLimitState {
    limiter: Option<Arc<RosterLimiter>>,
}

impl RateLimitState {
    pub fn new(changes_per_minute: u32) -> Self {
        let limiter = NonZeroU32::new(changes_per_minute)
            .map(|n| Arc::new(RateLimiter::direct(Quota::per_minute(n))));

        Self { limiter }
    }

    /// Quota large enough that tests never hit it.
    pub fn permissive() -> Self {
        Self::new(100_000)
    }

    pub fn is_enabled(&self) -> bool {
        self.limiter.is_some()
    }

    /// Take one roster change from the quota, if any is left.
    pub fn try_acquire(&self) -> bool {
        self.limiter
            .as_ref()
            .map_or(true, |limiter| limiter.check().is_ok())
    }
}

impl Default for RateLimitState {
    fn default() -> Self {
        Self::new(DEFAULT_ROSTER_CHANGES_PER_MINUTE)
    }
}

/// Reject roster changes with 429 once the quota is spent.
pub async fn rate_limit_middleware(
    State(rate_limit): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    if !rate_limit.try_acquire() {
        warn!(method = %request.method(), uri = %request.uri(), "Roster change quota exhausted");
        return Err(ServiceError::RateLimitExceeded);
    }

    Ok(next.run(request).await)
}

/// Log each request with its outcome; client errors at warn.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    if status.is_client_error() || status.is_server_error() {
        warn!(%method, %uri, %status, ?duration, "Request rejected");
    } else {
        debug!(%method, %uri, %status, ?duration, "Request handled");
    }

    response
}
