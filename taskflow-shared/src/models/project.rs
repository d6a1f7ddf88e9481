/// Project model and database operations
///
/// Members live in a join table; the project row never duplicates the owner
/// into it. Deleting a project cascades to its membership rows, tasks and
/// (through tasks) comments.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(50) NOT NULL,
///     description VARCHAR(500) NOT NULL,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     added_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Maximum title length (characters)
pub const MAX_TITLE_LENGTH: u64 = 50;

/// Maximum description length (characters)
pub const MAX_DESCRIPTION_LENGTH: u64 = 500;

const PROJECT_COLUMNS: &str = "p.id, p.title, p.description, p.owner_id, p.created_at, \
     ARRAY(SELECT m.user_id FROM project_members m \
           WHERE m.project_id = p.id ORDER BY m.added_at) AS members";

/// Project with its owner and member ids
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,

    /// Creator; immutable
    #[serde(rename = "owner")]
    pub owner_id: Uuid,

    /// Members in the order they were added; never contains the owner
    pub members: Vec<Uuid>,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub owner_id: Uuid,
}

/// Fields to change; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl Project {
    /// Inserts a project with no members
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects AS p (title, description, owner_id) \
             VALUES ($1, $2, $3) RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects p WHERE p.id = $1",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Projects the user owns or belongs to, oldest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {} FROM projects p \
             WHERE p.owner_id = $1 \
                OR EXISTS (SELECT 1 FROM project_members m \
                           WHERE m.project_id = p.id AND m.user_id = $1) \
             ORDER BY p.created_at",
            PROJECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Applies the non-`None` fields of `data`
    ///
    /// Returns `None` if the project doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects AS p \
             SET title = COALESCE($2, p.title), description = COALESCE($3, p.description) \
             WHERE p.id = $1 RETURNING {}",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .fetch_optional(pool)
        .await
    }

    /// Appends `user_id` to the member list; adding an existing member is a no-op
    ///
    /// Returns `None` if the project doesn't exist
    pub async fn add_member(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query(
            "INSERT INTO project_members (project_id, user_id) \
             SELECT id, $2 FROM projects WHERE id = $1 \
             ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, id).await
    }

    /// Deletes a project and, through foreign keys, its tasks and comments
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
