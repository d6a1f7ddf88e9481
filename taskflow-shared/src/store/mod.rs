/// Persistence seam
///
/// Services talk to storage only through [`Store`], so the same authorization
/// and validation logic runs against PostgreSQL in production and against the
/// in-process [`MemoryStore`] in tests.
///
/// Every method is a single read or a single atomic write. Concurrent writes
/// to the same row are last-write-wins; there is no optimistic locking.
///
/// # Implementations
///
/// - [`PgStore`]: PostgreSQL via sqlx, schema from the embedded migrations
/// - [`MemoryStore`]: `tokio::sync::RwLock`-guarded collections
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use taskflow_shared::store::{MemoryStore, Store};
///
/// let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
/// ```

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    comment::{Comment, CreateComment},
    project::{CreateProject, Project, UpdateProject},
    task::{CreateTask, Task, UpdateTask},
    user::{CreateUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Error type for storage operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique column (username, email) already holds the value
    #[error("Duplicate value for unique field `{field}`")]
    UniqueViolation { field: String },

    /// Database error
    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let field = match db_err.constraint() {
                    Some(c) if c.contains("email") => "email",
                    Some(c) if c.contains("username") => "username",
                    _ => "value",
                };
                return StoreError::UniqueViolation {
                    field: field.to_string(),
                };
            }
        }

        StoreError::Database(err)
    }
}

/// Storage result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Document-style persistence for users, projects, tasks and comments
///
/// Lookups return `Ok(None)` for missing rows; mutations of a missing row
/// return `Ok(None)` / `Ok(false)`.
#[async_trait]
pub trait Store: Send + Sync {
    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// Short backend name for health output
    fn backend(&self) -> &'static str;

    // Users

    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;
    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;

    // Projects

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project>;
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;
    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>>;
    async fn update_project(&self, id: Uuid, data: UpdateProject) -> StoreResult<Option<Project>>;
    async fn add_project_member(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Project>>;

    /// Removes the project together with its tasks and their comments
    async fn delete_project(&self, id: Uuid) -> StoreResult<bool>;

    // Tasks

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task>;
    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>>;
    async fn list_tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>>;
    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>>;

    /// Removes the task together with its comments
    async fn delete_task(&self, id: Uuid) -> StoreResult<bool>;

    // Comments

    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment>;
    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;

    /// Newest first
    async fn list_comments_for_task(&self, task_id: Uuid) -> StoreResult<Vec<Comment>>;
    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool>;
}
