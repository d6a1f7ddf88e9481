/// In-process [`Store`]
///
/// Mirrors the PostgreSQL schema's behavior: unique usernames and emails,
/// insertion-ordered member lists, newest-first comments, and cascading
/// deletes from projects to tasks to comments. Selected at runtime with
/// `DATABASE_URL=memory://` and used by the test suites.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Store, StoreError, StoreResult};
use crate::models::{
    comment::{Comment, CreateComment},
    project::{CreateProject, Project, UpdateProject},
    task::{CreateTask, Task, UpdateTask},
    user::{CreateUser, User, DEFAULT_AVATAR},
};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    comments: Vec<Comment>,
}

/// Store holding every collection behind one lock
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut db = self.inner.write().await;

        if db.users.iter().any(|u| u.username == data.username) {
            return Err(StoreError::UniqueViolation {
                field: "username".to_string(),
            });
        }
        if db.users.iter().any(|u| u.email == data.email) {
            return Err(StoreError::UniqueViolation {
                field: "email".to_string(),
            });
        }

        let user = User {
            id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            avatar: data.avatar.unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            created_at: Utc::now(),
        };
        db.users.push(user.clone());

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let db = self.inner.read().await;
        Ok(db.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_users(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let db = self.inner.read().await;
        Ok(db
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn create_project(&self, data: CreateProject) -> StoreResult<Project> {
        let project = Project {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            owner_id: data.owner_id,
            members: Vec::new(),
            created_at: Utc::now(),
        };
        self.inner.write().await.projects.push(project.clone());

        Ok(project)
    }

    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let db = self.inner.read().await;
        Ok(db.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Project>> {
        let db = self.inner.read().await;
        Ok(db
            .projects
            .iter()
            .filter(|p| p.owner_id == user_id || p.members.contains(&user_id))
            .cloned()
            .collect())
    }

    async fn update_project(&self, id: Uuid, data: UpdateProject) -> StoreResult<Option<Project>> {
        let mut db = self.inner.write().await;
        let Some(project) = db.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(title) = data.title {
            project.title = title;
        }
        if let Some(description) = data.description {
            project.description = description;
        }

        Ok(Some(project.clone()))
    }

    async fn add_project_member(&self, id: Uuid, user_id: Uuid) -> StoreResult<Option<Project>> {
        let mut db = self.inner.write().await;
        let Some(project) = db.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if !project.members.contains(&user_id) {
            project.members.push(user_id);
        }

        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let mut db = self.inner.write().await;
        let before = db.projects.len();
        db.projects.retain(|p| p.id != id);
        if db.projects.len() == before {
            return Ok(false);
        }

        let task_ids: Vec<Uuid> = db
            .tasks
            .iter()
            .filter(|t| t.project_id == id)
            .map(|t| t.id)
            .collect();
        db.tasks.retain(|t| t.project_id != id);
        db.comments.retain(|c| !task_ids.contains(&c.task_id));

        Ok(true)
    }

    async fn create_task(&self, data: CreateTask) -> StoreResult<Task> {
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            project_id: data.project_id,
            assigned_to: data.assigned_to,
            due_date: data.due_date,
            created_at: Utc::now(),
        };
        self.inner.write().await.tasks.push(task.clone());

        Ok(task)
    }

    async fn find_task(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let db = self.inner.read().await;
        Ok(db.tasks.iter().find(|t| t.id == id).cloned())
    }

    async fn list_tasks_for_project(&self, project_id: Uuid) -> StoreResult<Vec<Task>> {
        let db = self.inner.read().await;
        Ok(db
            .tasks
            .iter()
            .filter(|t| t.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn update_task(&self, id: Uuid, data: UpdateTask) -> StoreResult<Option<Task>> {
        let mut db = self.inner.write().await;
        let Some(task) = db.tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };

        if let Some(title) = data.title {
            task.title = title;
        }
        if let Some(description) = data.description {
            task.description = description;
        }
        if let Some(status) = data.status {
            task.status = status;
        }
        if let Some(priority) = data.priority {
            task.priority = priority;
        }
        if let Some(assigned_to) = data.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(due_date) = data.due_date {
            task.due_date = due_date;
        }

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid) -> StoreResult<bool> {
        let mut db = self.inner.write().await;
        let before = db.tasks.len();
        db.tasks.retain(|t| t.id != id);
        if db.tasks.len() == before {
            return Ok(false);
        }

        db.comments.retain(|c| c.task_id != id);
        Ok(true)
    }

    async fn create_comment(&self, data: CreateComment) -> StoreResult<Comment> {
        let comment = Comment {
            id: Uuid::new_v4(),
            text: data.text,
            task_id: data.task_id,
            user_id: data.user_id,
            created_at: Utc::now(),
        };
        self.inner.write().await.comments.push(comment.clone());

        Ok(comment)
    }

    async fn find_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let db = self.inner.read().await;
        Ok(db.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_comments_for_task(&self, task_id: Uuid) -> StoreResult<Vec<Comment>> {
        let db = self.inner.read().await;

        // Reverse insertion order first so equal timestamps stay newest-first
        let mut comments: Vec<Comment> = db
            .comments
            .iter()
            .rev()
            .filter(|c| c.task_id == task_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(comments)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<bool> {
        let mut db = self.inner.write().await;
        let before = db.comments.len();
        db.comments.retain(|c| c.id != id);
        Ok(db.comments.len() != before)
    }
}
