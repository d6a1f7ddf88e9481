/// Request actor
///
/// The session layer resolves a verified token to an [`Actor`] and passes it
/// explicitly into every service call.

use serde::Serialize;
use uuid::Uuid;

use crate::models::user::{User, UserProfile};

/// Authenticated user making the current request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: String,
}

impl Actor {
    /// Public profile, as returned by `GET /api/auth/me`
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            avatar: self.avatar.clone(),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

impl From<User> for Actor {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_actor_from_user_drops_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            avatar: "a.png".to_string(),
            created_at: Utc::now(),
        };

        let actor = Actor::from(&user);
        assert_eq!(actor.id, user.id);

        let json = serde_json::to_string(&actor.profile()).unwrap();
        assert!(json.contains("alice@example.com"));
        assert!(!json.contains("argon2"));
    }
}
