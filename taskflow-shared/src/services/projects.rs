/// Project operations
///
/// Reads are open to the owner and members; update, delete and add-member
/// are owner-only. Every operation checks existence before authorization.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{trimmed, users_by_id};
use crate::auth::actor::Actor;
use crate::auth::authorization::{can_access_project, can_mutate_project, require};
use crate::error::{ServiceError, ServiceResult};
use crate::models::project::{
    CreateProject, Project, UpdateProject, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
};
use crate::models::task::TaskStatus;
use crate::models::user::{UserProfile, UserSummary};
use crate::store::Store;

/// Project creation input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewProject {
    #[validate(
        required(message = "Please provide a project title"),
        length(max = MAX_TITLE_LENGTH, message = "Title can not be more than 50 characters")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Please provide a description"),
        length(
            max = MAX_DESCRIPTION_LENGTH,
            message = "Description can not be more than 500 characters"
        )
    )]
    pub description: Option<String>,
}

/// Project update input; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProjectPatch {
    #[validate(length(
        min = 1,
        max = MAX_TITLE_LENGTH,
        message = "Title must be between 1 and 50 characters"
    ))]
    pub title: Option<String>,

    #[validate(length(
        min = 1,
        max = MAX_DESCRIPTION_LENGTH,
        message = "Description must be between 1 and 500 characters"
    ))]
    pub description: Option<String>,
}

/// Add-member input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddMember {
    pub email: Option<String>,
}

/// Project as listed on the dashboard
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub owner: Option<UserSummary>,
    pub members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Project with owner and members populated
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub owner: Option<UserProfile>,
    pub members: Vec<UserProfile>,
    pub created_at: DateTime<Utc>,
}

/// Task counts for one project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total: usize,
    pub to_do: usize,
    pub in_progress: usize,
    pub done: usize,

    /// Due date in the past and not done
    pub overdue: usize,

    /// Rounded percentage of done tasks, 0 when there are none
    pub completion_rate: u32,
}

#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Projects the actor owns or belongs to, oldest first
    pub async fn list(&self, actor: &Actor) -> ServiceResult<Vec<ProjectListItem>> {
        let projects = self.store.list_projects_for_user(actor.id).await?;

        let mut owner_ids: Vec<Uuid> = projects.iter().map(|p| p.owner_id).collect();
        owner_ids.sort();
        owner_ids.dedup();
        let owners = users_by_id(self.store.as_ref(), &owner_ids).await?;

        Ok(projects
            .into_iter()
            .map(|p| ProjectListItem {
                owner: owners.get(&p.owner_id).map(UserSummary::from),
                id: p.id,
                title: p.title,
                description: p.description,
                members: p.members,
                created_at: p.created_at,
            })
            .collect())
    }

    /// Single project with owner and members populated
    pub async fn get(&self, id: Uuid, actor: &Actor) -> ServiceResult<ProjectDetail> {
        let project = self.load(id).await?;
        require(
            can_access_project(&project, actor.id),
            "Not authorized to view this project",
        )?;

        self.detail(project).await
    }

    /// Creates a project owned by the actor, with no members
    pub async fn create(&self, actor: &Actor, input: NewProject) -> ServiceResult<Project> {
        let input = NewProject {
            title: trimmed(input.title),
            description: trimmed(input.description),
        };
        input.validate()?;

        let (Some(title), Some(description)) = (input.title, input.description) else {
            return Err(ServiceError::Validation(
                "Please provide a project title and description".to_string(),
            ));
        };

        let project = self
            .store
            .create_project(CreateProject {
                title,
                description,
                owner_id: actor.id,
            })
            .await?;

        info!(project_id = %project.id, owner_id = %actor.id, "Project created");
        Ok(project)
    }

    /// Owner-only update of title and description
    pub async fn update(
        &self,
        id: Uuid,
        actor: &Actor,
        patch: ProjectPatch,
    ) -> ServiceResult<Project> {
        let project = self.load(id).await?;
        require(
            can_mutate_project(&project, actor.id),
            "Not authorized to update this project",
        )?;

        let patch = ProjectPatch {
            title: patch.title.map(|t| t.trim().to_string()),
            description: patch.description.map(|d| d.trim().to_string()),
        };
        patch.validate()?;

        self.store
            .update_project(
                id,
                UpdateProject {
                    title: patch.title,
                    description: patch.description,
                },
            )
            .await?
            .ok_or_else(|| ServiceError::not_found("Project"))
    }

    /// Owner-only; removes the project's tasks and their comments too
    pub async fn delete(&self, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        let project = self.load(id).await?;
        require(
            can_mutate_project(&project, actor.id),
            "Not authorized to delete this project",
        )?;

        self.store.delete_project(id).await?;

        info!(project_id = %id, "Project deleted");
        Ok(())
    }

    /// Owner-only; adds the user registered under `email` as a member
    ///
    /// # Errors
    ///
    /// - `Validation`: email missing
    /// - `NotFound`: no such project, or no user with that email
    /// - `Unauthorized`: actor is not the owner
    /// - `DuplicateMember`: target already owns or belongs to the project
    pub async fn add_member(
        &self,
        id: Uuid,
        actor: &Actor,
        input: AddMember,
    ) -> ServiceResult<ProjectDetail> {
        let Some(email) = trimmed(input.email).map(|e| e.to_lowercase()) else {
            return Err(ServiceError::Validation("Email is required".to_string()));
        };

        let project = self.load(id).await?;
        require(
            can_mutate_project(&project, actor.id),
            "Only project owner can add members",
        )?;

        let user = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::not_found("User"))?;

        if can_access_project(&project, user.id) {
            return Err(ServiceError::DuplicateMember(
                "User already part of project".to_string(),
            ));
        }

        let project = self
            .store
            .add_project_member(id, user.id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project"))?;

        info!(project_id = %id, member_id = %user.id, "Member added");
        self.detail(project).await
    }

    /// Task counts per status for an accessible project
    pub async fn stats(&self, id: Uuid, actor: &Actor) -> ServiceResult<ProjectStats> {
        let project = self.load(id).await?;
        require(
            can_access_project(&project, actor.id),
            "Not authorized to view this project",
        )?;

        let tasks = self.store.list_tasks_for_project(id).await?;
        let now = Utc::now();

        let mut stats = ProjectStats {
            total: tasks.len(),
            ..Default::default()
        };
        for task in &tasks {
            match task.status {
                TaskStatus::ToDo => stats.to_do += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Done => stats.done += 1,
            }
            if task.status != TaskStatus::Done && task.due_date.is_some_and(|due| due < now) {
                stats.overdue += 1;
            }
        }
        if stats.total > 0 {
            stats.completion_rate = (stats.done as f64 / stats.total as f64 * 100.0).round() as u32;
        }

        Ok(stats)
    }

    async fn load(&self, id: Uuid) -> ServiceResult<Project> {
        self.store
            .find_project(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project"))
    }

    async fn detail(&self, project: Project) -> ServiceResult<ProjectDetail> {
        let mut ids = project.members.clone();
        ids.push(project.owner_id);
        let users = users_by_id(self.store.as_ref(), &ids).await?;

        Ok(ProjectDetail {
            owner: users.get(&project.owner_id).map(UserProfile::from),
            members: project
                .members
                .iter()
                .filter_map(|id| users.get(id).map(UserProfile::from))
                .collect(),
            id: project.id,
            title: project.title,
            description: project.description,
            created_at: project.created_at,
        })
    }
}
