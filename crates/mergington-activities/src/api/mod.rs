//! HTTP API for the activities service.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{
    logging_middleware, rate_limit_middleware, RateLimitState, DEFAULT_ROSTER_CHANGES_PER_MINUTE,
};
pub use types::*;

use crate::registry::Registry;
use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Activity registry
    pub registry: Arc<Registry>,
    /// When the service started
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Create new application state.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry: Arc::new(registry),
            started_at: Utc::now(),
        }
    }
}

/// Create the API router with the default roster-change quota.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    create_router_with_rate_limit(state, static_dir, RateLimitState::default())
}

/// Create the API router with a custom roster-change quota.
pub fn create_router_with_rate_limit(
    state: AppState,
    static_dir: impl AsRef<Path>,
    rate_limit: RateLimitState,
) -> Router {
    // Only roster changes draw from the quota
    let roster = Router::new()
        .route("/activities/:activity_name/signup", post(handlers::signup))
        .route(
            "/activities/:activity_name/unregister",
            delete(handlers::unregister),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/activities", get(handlers::list_activities))
        .merge(roster)
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
