/// Task operations
///
/// Tasks inherit access from their project: the owner and every member may
/// list, create, update and delete them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{trimmed, users_by_id};
use crate::auth::actor::Actor;
use crate::auth::authorization::{can_access_project, can_mutate_task, require};
use crate::error::{ServiceError, ServiceResult};
use crate::models::project::Project;
use crate::models::task::{
    CreateTask, Task, TaskPriority, TaskStatus, UpdateTask, MAX_TITLE_LENGTH,
};
use crate::models::user::UserSummary;
use crate::store::Store;

/// Task creation input
///
/// Status and priority arrive as their display strings and are checked
/// against the fixed enumerations.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[validate(
        required(message = "Please provide a task title"),
        length(max = MAX_TITLE_LENGTH, message = "Title can not be more than 100 characters")
    )]
    pub title: Option<String>,

    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Task update input
///
/// `assignedTo` and `dueDate` distinguish an absent key (unchanged) from an
/// explicit `null` (cleared).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[validate(length(
        min = 1,
        max = MAX_TITLE_LENGTH,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: Option<String>,

    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,

    #[serde(default, deserialize_with = "present")]
    pub assigned_to: Option<Option<Uuid>>,

    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Task with its assignee populated
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub project: Uuid,
    pub assigned_to: Option<UserSummary>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TaskView {
    fn new(task: Task, assignee: Option<UserSummary>) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            project: task.project_id,
            assigned_to: assignee,
            due_date: task.due_date,
            created_at: task.created_at,
        }
    }
}

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Tasks of an accessible project, oldest first
    pub async fn list(&self, project_id: Uuid, actor: &Actor) -> ServiceResult<Vec<TaskView>> {
        let project = self.project(project_id).await?;
        require(can_access_project(&project, actor.id), "Not authorized")?;

        let tasks = self.store.list_tasks_for_project(project_id).await?;

        let mut assignee_ids: Vec<Uuid> = tasks.iter().filter_map(|t| t.assigned_to).collect();
        assignee_ids.sort();
        assignee_ids.dedup();
        let assignees = users_by_id(self.store.as_ref(), &assignee_ids).await?;

        Ok(tasks
            .into_iter()
            .map(|task| {
                let assignee = task
                    .assigned_to
                    .and_then(|id| assignees.get(&id))
                    .map(UserSummary::from);
                TaskView::new(task, assignee)
            })
            .collect())
    }

    /// Adds a task to an accessible project
    pub async fn create(
        &self,
        project_id: Uuid,
        actor: &Actor,
        input: NewTask,
    ) -> ServiceResult<TaskView> {
        let project = self.project(project_id).await?;
        require(
            can_mutate_task(&project, actor.id),
            "Not authorized to add tasks to this project",
        )?;

        let input = NewTask {
            title: trimmed(input.title),
            ..input
        };
        input.validate()?;

        let Some(title) = input.title else {
            return Err(ServiceError::Validation("Please provide a task title".to_string()));
        };
        let status = input
            .status
            .as_deref()
            .map(str::parse::<TaskStatus>)
            .transpose()?
            .unwrap_or_default();
        let priority = input
            .priority
            .as_deref()
            .map(str::parse::<TaskPriority>)
            .transpose()?
            .unwrap_or_default();
        if let Some(user_id) = input.assigned_to {
            self.check_assignee(user_id).await?;
        }

        let task = self
            .store
            .create_task(CreateTask {
                project_id,
                title,
                description: input.description.unwrap_or_default(),
                status,
                priority,
                assigned_to: input.assigned_to,
                due_date: input.due_date,
            })
            .await?;

        info!(task_id = %task.id, project_id = %project_id, "Task created");
        self.view(task).await
    }

    /// Applies a patch to a task of an accessible project
    pub async fn update(&self, id: Uuid, actor: &Actor, patch: TaskPatch) -> ServiceResult<TaskView> {
        let task = self.load(id).await?;
        let project = self.project(task.project_id).await?;
        require(can_mutate_task(&project, actor.id), "Not authorized")?;

        let patch = TaskPatch {
            title: patch.title.map(|t| t.trim().to_string()),
            ..patch
        };
        patch.validate()?;

        let status = patch
            .status
            .as_deref()
            .map(str::parse::<TaskStatus>)
            .transpose()?;
        let priority = patch
            .priority
            .as_deref()
            .map(str::parse::<TaskPriority>)
            .transpose()?;
        if let Some(Some(user_id)) = patch.assigned_to {
            self.check_assignee(user_id).await?;
        }

        let task = self
            .store
            .update_task(
                id,
                UpdateTask {
                    title: patch.title,
                    description: patch.description,
                    status,
                    priority,
                    assigned_to: patch.assigned_to,
                    due_date: patch.due_date,
                },
            )
            .await?
            .ok_or_else(|| ServiceError::not_found("Task"))?;

        self.view(task).await
    }

    /// Removes a task and its comments
    pub async fn delete(&self, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        let task = self.load(id).await?;
        let project = self.project(task.project_id).await?;
        require(can_mutate_task(&project, actor.id), "Not authorized")?;

        self.store.delete_task(id).await?;

        info!(task_id = %id, "Task deleted");
        Ok(())
    }

    async fn load(&self, id: Uuid) -> ServiceResult<Task> {
        self.store
            .find_task(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task"))
    }

    async fn project(&self, id: Uuid) -> ServiceResult<Project> {
        self.store
            .find_project(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project"))
    }

    async fn check_assignee(&self, user_id: Uuid) -> ServiceResult<()> {
        match self.store.find_user(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::Validation("Assigned user does not exist".to_string())),
        }
    }

    async fn view(&self, task: Task) -> ServiceResult<TaskView> {
        let assignee = match task.assigned_to {
            Some(id) => self.store.find_user(id).await?.as_ref().map(UserSummary::from),
            None => None,
        };
        Ok(TaskView::new(task, assignee))
    }
}
