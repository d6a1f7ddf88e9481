/// Request extractors
///
/// [`ApiJson`] turns body rejections into envelope errors; [`parse_id`]
/// maps an unparseable path id to the route entity's `NotFound`.

use axum::extract::FromRequest;
use taskflow_shared::error::ServiceError;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// `axum::Json` with [`ApiError`] as its rejection
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Parses a path segment as an entity id
///
/// A malformed id cannot name an existing entity, so it reports the same
/// `NotFound` as a well-formed id with no row.
pub fn parse_id(raw: &str, entity: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ServiceError::not_found(entity).into())
}
