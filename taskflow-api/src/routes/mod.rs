/// API route handlers
///
/// - `health`: liveness banner and health check
/// - `auth`: register, login, logout, current user
/// - `projects`: project CRUD, membership, stats
/// - `tasks`: tasks within a project
/// - `comments`: comments on a task

pub mod auth;
pub mod comments;
pub mod health;
pub mod projects;
pub mod tasks;

use crate::error::ApiError;

/// Unmatched paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
