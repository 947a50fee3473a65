//! API request and response types.

use serde::{Deserialize, Serialize};

/// Query parameters for signup and unregister.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    /// Student email, taken as-is
    pub email: String,
}

/// Confirmation returned by signup and unregister.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub activity_count: usize,
    pub participant_count: usize,
    pub started_at: String,
}
