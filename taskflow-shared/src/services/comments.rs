/// Comment operations
///
/// Reading and adding comments requires access to the task's parent project.
/// Deleting is reserved to the comment's author.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{trimmed, users_by_id};
use crate::auth::actor::Actor;
use crate::auth::authorization::{can_access_project, can_add_comment, can_delete_comment, require};
use crate::error::{ServiceError, ServiceResult};
use crate::models::comment::{Comment, CreateComment};
use crate::models::project::Project;
use crate::models::task::Task;
use crate::models::user::UserSummary;
use crate::store::Store;

/// Comment creation input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewComment {
    pub text: Option<String>,
}

/// Comment with its author populated
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    pub task: Uuid,
    pub user: Option<UserSummary>,
    pub created_at: DateTime<Utc>,
}

impl CommentView {
    fn new(comment: Comment, author: Option<UserSummary>) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            task: comment.task_id,
            user: author,
            created_at: comment.created_at,
        }
    }
}

#[derive(Clone)]
pub struct CommentService {
    store: Arc<dyn Store>,
}

impl CommentService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Comments on a task, newest first
    pub async fn list_for_task(&self, task_id: Uuid, actor: &Actor) -> ServiceResult<Vec<CommentView>> {
        let (_, project) = self.task_and_project(task_id).await?;
        require(can_access_project(&project, actor.id), "Not authorized")?;

        let comments = self.store.list_comments_for_task(task_id).await?;

        let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
        author_ids.sort();
        author_ids.dedup();
        let authors = users_by_id(self.store.as_ref(), &author_ids).await?;

        Ok(comments
            .into_iter()
            .map(|comment| {
                let author = authors.get(&comment.user_id).map(UserSummary::from);
                CommentView::new(comment, author)
            })
            .collect())
    }

    /// Adds a comment authored by the actor
    pub async fn add(&self, task_id: Uuid, actor: &Actor, input: NewComment) -> ServiceResult<CommentView> {
        let (task, project) = self.task_and_project(task_id).await?;
        require(can_add_comment(&project, actor.id), "Not authorized")?;

        let Some(text) = trimmed(input.text) else {
            return Err(ServiceError::Validation("Please provide comment text".to_string()));
        };

        let comment = self
            .store
            .create_comment(CreateComment {
                task_id: task.id,
                user_id: actor.id,
                text,
            })
            .await?;

        info!(comment_id = %comment.id, task_id = %task.id, "Comment added");

        let author = UserSummary {
            id: actor.id,
            username: actor.username.clone(),
            avatar: actor.avatar.clone(),
        };
        Ok(CommentView::new(comment, Some(author)))
    }

    /// Author-only
    pub async fn delete(&self, id: Uuid, actor: &Actor) -> ServiceResult<()> {
        let comment = self
            .store
            .find_comment(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comment"))?;
        require(
            can_delete_comment(&comment, actor.id),
            "Not authorized to delete this comment",
        )?;

        self.store.delete_comment(id).await?;

        info!(comment_id = %id, "Comment deleted");
        Ok(())
    }

    async fn task_and_project(&self, task_id: Uuid) -> ServiceResult<(Task, Project)> {
        let task = self
            .store
            .find_task(task_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Task"))?;
        let project = self
            .store
            .find_project(task.project_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Project"))?;

        Ok((task, project))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::CreateProject;
    use crate::models::task::{CreateTask, TaskPriority, TaskStatus};
    use crate::models::user::CreateUser;
    use crate::store::MemoryStore;

    struct Fixture {
        svc: CommentService,
        owner: Actor,
        stranger: Actor,
        task_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let mut actors = Vec::new();
        for name in ["alice", "mallory"] {
            let user = store
                .create_user(CreateUser {
                    username: name.to_string(),
                    email: format!("{}@example.com", name),
                    password_hash: "hash".to_string(),
                    avatar: None,
                })
                .await
                .unwrap();
            actors.push(Actor::from(user));
        }
        let stranger = actors.pop().unwrap();
        let owner = actors.pop().unwrap();

        let project = store
            .create_project(CreateProject {
                title: "Launch".to_string(),
                description: "Ship it".to_string(),
                owner_id: owner.id,
            })
            .await
            .unwrap();
        let task = store
            .create_task(CreateTask {
                project_id: project.id,
                title: "Write docs".to_string(),
                description: String::new(),
                status: TaskStatus::ToDo,
                priority: TaskPriority::Medium,
                assigned_to: None,
                due_date: None,
            })
            .await
            .unwrap();

        Fixture {
            svc: CommentService::new(store),
            owner,
            stranger,
            task_id: task.id,
        }
    }

    fn text(t: &str) -> NewComment {
        NewComment {
            text: Some(t.to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_trims_and_populates_author() {
        let f = fixture().await;
        let view = f.svc.add(f.task_id, &f.owner, text("  looks good ")).await.unwrap();

        assert_eq!(view.text, "looks good");
        assert_eq!(view.user.as_ref().map(|u| u.username.as_str()), Some("alice"));
    }

    #[tokio::test]
    async fn test_add_rejects_blank_text() {
        let f = fixture().await;
        let err = f.svc.add(f.task_id, &f.owner, text("   ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "Please provide comment text"));
    }

    #[tokio::test]
    async fn test_stranger_cannot_read_or_add() {
        let f = fixture().await;

        let err = f.svc.list_for_task(f.task_id, &f.stranger).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));

        let err = f.svc.add(f.task_id, &f.stranger, text("hi")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_missing_task_and_comment() {
        let f = fixture().await;

        let err = f.svc.list_for_task(Uuid::new_v4(), &f.owner).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Task not found"));

        let err = f.svc.delete(Uuid::new_v4(), &f.owner).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(ref m) if m == "Comment not found"));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let f = fixture().await;
        f.svc.add(f.task_id, &f.owner, text("first")).await.unwrap();
        f.svc.add(f.task_id, &f.owner, text("second")).await.unwrap();

        let comments = f.svc.list_for_task(f.task_id, &f.owner).await.unwrap();
        let texts: Vec<&str> = comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }
}
