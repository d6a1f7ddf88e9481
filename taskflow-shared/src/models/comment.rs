/// Comment model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     text TEXT NOT NULL,
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

const COMMENT_COLUMNS: &str = "id, text, task_id, user_id, created_at";

/// Comment on a task
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,

    /// Trimmed, non-empty
    pub text: String,

    #[serde(rename = "task")]
    pub task_id: Uuid,

    /// Author
    #[serde(rename = "user")]
    pub user_id: Uuid,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub task_id: Uuid,
    pub user_id: Uuid,
    pub text: String,
}

impl Comment {
    /// Inserts a comment
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "INSERT INTO comments (task_id, user_id, text) VALUES ($1, $2, $3) RETURNING {}",
            COMMENT_COLUMNS
        ))
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.text)
        .fetch_one(pool)
        .await
    }

    /// Finds a comment by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE id = $1",
            COMMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Comments on a task, newest first
    pub async fn list_for_task(pool: &PgPool, task_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(&format!(
            "SELECT {} FROM comments WHERE task_id = $1 ORDER BY created_at DESC, id DESC",
            COMMENT_COLUMNS
        ))
        .bind(task_id)
        .fetch_all(pool)
        .await
    }

    /// Deletes a comment by ID
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
