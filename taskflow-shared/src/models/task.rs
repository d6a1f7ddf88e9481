/// Task model and database operations
///
/// Tasks belong to exactly one project and move across the kanban columns
/// freely; no transition between statuses is forbidden.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('To Do', 'In Progress', 'Done');
/// CREATE TYPE task_priority AS ENUM ('Low', 'Medium', 'High');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(100) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     status task_status NOT NULL DEFAULT 'To Do',
///     priority task_priority NOT NULL DEFAULT 'Medium',
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assigned_to UUID REFERENCES users(id) ON DELETE SET NULL,
///     due_date TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::ServiceError;

/// Maximum title length (characters)
pub const MAX_TITLE_LENGTH: u64 = 100;

const TASK_COLUMNS: &str =
    "id, title, description, status, priority, project_id, assigned_to, due_date, created_at";

/// Kanban column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    #[sqlx(rename = "To Do")]
    ToDo,

    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,

    #[serde(rename = "Done")]
    #[sqlx(rename = "Done")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "`{}` is not a valid status (expected To Do, In Progress or Done)",
                    s
                ))
            })
    }
}

/// Task urgency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == s)
            .ok_or_else(|| {
                ServiceError::Validation(format!(
                    "`{}` is not a valid priority (expected Low, Medium or High)",
                    s
                ))
            })
    }
}

/// Task on a project board
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,

    /// Parent project; immutable
    #[serde(rename = "project")]
    pub project_id: Uuid,

    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub project_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Fields to change; only `Some` values are written
///
/// `assigned_to` and `due_date` use `Some(None)` to clear the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Option<Uuid>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl Task {
    /// Inserts a task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (project_id, title, description, status, priority, assigned_to, due_date) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(data.project_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.status)
        .bind(data.priority)
        .bind(data.assigned_to)
        .bind(data.due_date)
        .fetch_one(pool)
        .await
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Tasks of a project, oldest first
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE project_id = $1 ORDER BY created_at",
            TASK_COLUMNS
        ))
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Writes the `Some` fields of `data`
    ///
    /// Returns `None` if the task doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET list from the fields that are present
        let mut assignments = Vec::new();
        let mut bind_count = 1;

        for (column, present) in [
            ("title", data.title.is_some()),
            ("description", data.description.is_some()),
            ("status", data.status.is_some()),
            ("priority", data.priority.is_some()),
            ("assigned_to", data.assigned_to.is_some()),
            ("due_date", data.due_date.is_some()),
        ] {
            if present {
                bind_count += 1;
                assignments.push(format!("{} = ${}", column, bind_count));
            }
        }

        if assignments.is_empty() {
            return Self::find_by_id(pool, id).await;
        }

        let query = format!(
            "UPDATE tasks SET {} WHERE id = $1 RETURNING {}",
            assignments.join(", "),
            TASK_COLUMNS
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(assigned_to) = data.assigned_to {
            q = q.bind(assigned_to);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        q.fetch_optional(pool).await
    }

    /// Deletes a task and, through foreign keys, its comments
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
