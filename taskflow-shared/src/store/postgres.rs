/// PostgreSQL-backed [`Store`]
///
/// Thin delegation to the model queries. Cascading deletes are enforced by
/// the schema's foreign keys, so each delete stays a single statement.
///
/// # Example
///
/// ```no_run
/// use taskflow_shared::db::pool::{create_pool, DatabaseConfig};
/// use taskflow_shared::store::PgStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// }).await?;
///
/// let store = PgStore::new(pool);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Store, StoreResult};
use crate::db::pool::health_check;
use crate::models::{
    comment::{Comment, CreateComment},
    project::{CreateProject, Project, UpdateProject},
    task::{CreateTask, Task, UpdateTask},
    user::{CreateUser, User},
};

/// Store over a sqlx connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_username(&self.pool, username).await?)
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        Ok(User::find_many(&self.pool, ids).await?)
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        Ok(Project::create(&self.pool, data).await?)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        Ok(Project::list_for_user(&self.pool, user_id).await?)
    }

    async fn update_project(&self, id: Uuid, data: UpdateProject) -> StoreResult<Option<Project>> {
        Ok(Project::update(&self.pool, id, data).await?)
    }

    async fn add_project_member(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::add_member(&self.pool, id, user_id).await?)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Project::delete(&self.pool, id).await?)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        Ok(Task::create(&self.pool, data).await?)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::list_for_project(&self.pool, project_id).await?)
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        Ok(Task::update(&self.pool, id, data).await?)
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Task::delete(&self.pool, id).await?)
    }

    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        Ok(Comment::create(&self.pool, data).await?)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        Ok(Comment::find_by_id(&self.pool, id).await?)
    }

    async fn list_comments_for_task(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        Ok(Comment::list_for_task(&self.pool, task_id).await?)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        Ok(Comment::delete(&self.pool, id).await?)
    }
}
