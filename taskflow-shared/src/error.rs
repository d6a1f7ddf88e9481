/// Service-level error taxonomy
///
/// Services raise these typed failures; the HTTP boundary maps them to status
/// codes and the response envelope. Variants carry a user-facing message only,
/// internal detail stays in `Internal` and is logged at the boundary.
///
/// # Example
///
/// ```
/// use taskflow_shared::error::ServiceError;
///
/// let err = ServiceError::not_found("Project");
/// assert_eq!(err.to_string(), "Project not found");
/// ```

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Result alias used by every service operation
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure raised by a service operation
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed, missing or out-of-range field
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid session
    #[error("{0}")]
    Unauthenticated(String),

    /// Valid session, insufficient role
    #[error("{0}")]
    Unauthorized(String),

    /// Entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Target user already owns or belongs to the project
    #[error("{0}")]
    DuplicateMember(String),

    /// Uniqueness violation (username, email)
    #[error("{0}")]
    Conflict(String),

    /// Unexpected persistence or runtime failure
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// `NotFound` for the named entity kind
    pub fn not_found(entity: &str) -> Self {
        ServiceError::NotFound(format!("{} not found", entity))
    }

    /// `Unauthorized` with the given message
    pub fn unauthorized(message: impl Into<String>) -> Self {
        ServiceError::Unauthorized(message.into())
    }

    /// Short machine-readable kind, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation",
            ServiceError::Unauthenticated(_) => "unauthenticated",
            ServiceError::Unauthorized(_) => "unauthorized",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::DuplicateMember(_) => "duplicate_member",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { field } => {
                ServiceError::Conflict(format!("A user with that {} already exists", field))
            }
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(format!("Password operation failed: {}", err))
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::CreateError(msg) => ServiceError::Internal(msg),
            _ => ServiceError::Unauthenticated("Not authorized to access this route".to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    let message = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid {}", field));
                    (field.to_string(), message)
                })
            })
            .collect();

        // HashMap order is unstable
        messages.sort();

        ServiceError::Validation(
            messages
                .into_iter()
                .map(|(_, message)| message)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}
