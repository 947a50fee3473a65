//! HTTP request handlers.

use super::types::{EmailQuery, HealthResponse, MessageResponse};
use super::AppState;
use crate::error::ServiceError;
use crate::registry::Snapshot;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Redirect,
    Json,
};
use tracing::debug;

/// Location of the front-end entry page.
pub const INDEX_PATH: &str = "/static/index.html";

/// Redirect the root path to the front-end.
pub async fn root() -> Redirect {
    Redirect::temporary(INDEX_PATH)
}

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.registry.list();
    let participant_count: usize = snapshot
        .iter()
        .map(|(_, activity)| activity.participants.len())
        .sum();

    Json(HealthResponse {
        status: "ok".to_string(),
        activity_count: snapshot.len(),
        participant_count,
        started_at: state.started_at.to_rfc3339(),
    })
}

/// List every activity with its roster.
pub async fn list_activities(State(state): State<AppState>) -> Json<Snapshot> {
    let snapshot = state.registry.list();
    debug!(count = snapshot.len(), "Listing activities");
    Json(snapshot)
}

/// Sign a student up for an activity.
pub async fn signup(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let Query(EmailQuery { email }) = query?;

    let message = state.registry.signup(&activity_name, &email)?;
    Ok(Json(MessageResponse { message }))
}

/// Remove a student from an activity.
pub async fn unregister(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> Result<Json<MessageResponse>, ServiceError> {
    let Query(EmailQuery { email }) = query?;

    let message = state.registry.unregister(&activity_name, &email)?;
    Ok(Json(MessageResponse { message }))
}
