/// Authorization policy
///
/// Pure predicates answering "may this actor do X to that entity". Every
/// service consults exactly one of these after it has confirmed the entity
/// exists, so a missing entity is always `NotFound` and an existing entity the
/// actor may not touch is always `Unauthorized`.
///
/// # Roles
///
/// - **Owner**: the project's creator. Sole right to update, delete and add members.
/// - **Member**: may read the project and create, update and delete its tasks and comments.
/// - **Author**: the only user who may delete a given comment, regardless of project role.
///
/// # Example
///
/// ```
/// use taskflow_shared::auth::authorization::{can_access_project, can_mutate_project};
/// use taskflow_shared::models::project::Project;
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let owner = Uuid::new_v4();
/// let member = Uuid::new_v4();
/// let project = Project {
///     id: Uuid::new_v4(),
///     title: "Launch".to_string(),
///     description: "Ship it".to_string(),
///     owner_id: owner,
///     members: vec![member],
///     created_at: Utc::now(),
/// };
///
/// assert!(can_access_project(&project, member));
/// assert!(!can_mutate_project(&project, member));
/// assert!(can_mutate_project(&project, owner));
/// ```

use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use crate::models::{comment::Comment, project::Project};

/// Actor created the project
pub fn is_project_owner(project: &Project, actor_id: Uuid) -> bool {
    project.owner_id == actor_id
}

/// Actor was added to the project by its owner
pub fn is_project_member(project: &Project, actor_id: Uuid) -> bool {
    project.members.contains(&actor_id)
}

/// Owner or member
pub fn can_access_project(project: &Project, actor_id: Uuid) -> bool {
    is_project_owner(project, actor_id) || is_project_member(project, actor_id)
}

/// Update, delete and add-member are owner-only
pub fn can_mutate_project(project: &Project, actor_id: Uuid) -> bool {
    is_project_owner(project, actor_id)
}

/// Members may create, update and delete tasks, not only the owner
pub fn can_mutate_task(project: &Project, actor_id: Uuid) -> bool {
    can_access_project(project, actor_id)
}

/// Only the author, independent of project role
pub fn can_delete_comment(comment: &Comment, actor_id: Uuid) -> bool {
    comment.user_id == actor_id
}

/// Checked against the task's parent project
pub fn can_add_comment(project: &Project, actor_id: Uuid) -> bool {
    can_access_project(project, actor_id)
}

/// Turns a predicate outcome into `Unauthorized` with `message`
///
/// ```
/// use taskflow_shared::auth::authorization::require;
///
/// assert!(require(true, "Not authorized").is_ok());
/// assert!(require(false, "Not authorized").is_err());
/// ```
pub fn require(allowed: bool, message: &str) -> ServiceResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(ServiceError::unauthorized(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn project(owner: Uuid, members: Vec<Uuid>) -> Project {
        Project {
            id: Uuid::new_v4(),
            title: "Launch".to_string(),
            description: "Ship the thing".to_string(),
            owner_id: owner,
            members,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_owner_member_stranger_matrix() {
        let owner = Uuid::new_v4();
        let member = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let p = project(owner, vec![member]);

        assert!(is_project_owner(&p, owner));
        assert!(!is_project_member(&p, owner));
        assert!(can_access_project(&p, owner));
        assert!(can_mutate_project(&p, owner));
        assert!(can_mutate_task(&p, owner));
        assert!(can_add_comment(&p, owner));

        assert!(!is_project_owner(&p, member));
        assert!(is_project_member(&p, member));
        assert!(can_access_project(&p, member));
        assert!(!can_mutate_project(&p, member));
        assert!(can_mutate_task(&p, member));
        assert!(can_add_comment(&p, member));

        assert!(!can_access_project(&p, stranger));
        assert!(!can_mutate_project(&p, stranger));
        assert!(!can_mutate_task(&p, stranger));
        assert!(!can_add_comment(&p, stranger));
    }

    #[test]
    fn test_comment_deletion_is_author_only() {
        let author = Uuid::new_v4();
        let comment = Comment {
            id: Uuid::new_v4(),
            text: "Looks good".to_string(),
            task_id: Uuid::new_v4(),
            user_id: author,
            created_at: Utc::now(),
        };

        assert!(can_delete_comment(&comment, author));
        assert!(!can_delete_comment(&comment, Uuid::new_v4()));
    }

    #[test]
    fn test_require_maps_to_unauthorized() {
        let err = require(false, "Only project owner can add members").unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
        assert_eq!(err.to_string(), "Only project owner can add members");
    }
}
