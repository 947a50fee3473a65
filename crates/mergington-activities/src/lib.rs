//! Mergington Activities - extracurricular activity signup service.
//!
//! Lists the school's activities and lets students sign up for or leave them
//! by email. All state lives in memory for the lifetime of the process.

pub mod api;
pub mod config;
pub mod error;
pub mod registry;

pub use config::Config;
pub use error::ServiceError;
pub use registry::{Activity, Registry, SeedActivity, Snapshot};
