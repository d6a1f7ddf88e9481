/// Business operations
///
/// Each service loads the target entity, checks it exists, consults
/// [`crate::auth::authorization`], then reads or writes through the
/// [`Store`]. The acting user is always an explicit argument.
///
/// # Services
///
/// - [`CredentialService`]: registration, login, token issue and session resolution
/// - [`ProjectService`]: project CRUD, membership, stats
/// - [`TaskService`]: tasks scoped to a project
/// - [`CommentService`]: comments scoped to a task
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskflow_shared::services::{Services, TokenSettings};
/// use taskflow_shared::store::MemoryStore;
///
/// let services = Services::new(
///     Arc::new(MemoryStore::new()),
///     TokenSettings {
///         secret: "0123456789abcdef0123456789abcdef".to_string(),
///         expires_in: chrono::Duration::days(30),
///     },
/// );
/// # let _ = services;
/// ```

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ServiceResult;
use crate::models::user::User;
use crate::store::Store;

pub mod comments;
pub mod credentials;
pub mod projects;
pub mod tasks;

pub use comments::{CommentService, CommentView, NewComment};
pub use credentials::{CredentialService, LoginUser, RegisterUser, TokenSettings};
pub use projects::{
    AddMember, NewProject, ProjectDetail, ProjectListItem, ProjectPatch, ProjectService,
    ProjectStats,
};
pub use tasks::{NewTask, TaskPatch, TaskService, TaskView};

/// All services over one shared store
#[derive(Clone)]
pub struct Services {
    pub credentials: CredentialService,
    pub projects: ProjectService,
    pub tasks: TaskService,
    pub comments: CommentService,
}

impl Services {
    pub fn new(store: Arc<dyn Store>, tokens: TokenSettings) -> Self {
        Self {
            credentials: CredentialService::new(store.clone(), tokens),
            projects: ProjectService::new(store.clone()),
            tasks: TaskService::new(store.clone()),
            comments: CommentService::new(store),
        }
    }
}

/// Trims the value and treats a blank result as absent
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Loads the referenced users keyed by id, skipping ids with no row
pub(crate) async fn users_by_id(
    store: &dyn Store,
    ids: &[Uuid],
) -> ServiceResult<HashMap<Uuid, User>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = store.find_users(ids).await?;
    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trimmed() {
        assert_eq!(trimmed(Some("  Launch ".to_string())), Some("Launch".to_string()));
        assert_eq!(trimmed(Some("   ".to_string())), None);
        assert_eq!(trimmed(None), None);
    }
}
