/// Credential store operations
///
/// Registration hashes the password before anything is persisted; plaintext
/// passwords and issued tokens never reach the logs.

use std::sync::Arc;

use chrono::Duration;
use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use super::trimmed;
use crate::auth::actor::Actor;
use crate::auth::jwt::{create_token, validate_token, Claims};
use crate::auth::password::{hash_password, verify_password, MIN_PASSWORD_LENGTH};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{CreateUser, User, MAX_USERNAME_LENGTH};
use crate::store::Store;

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const SESSION_REQUIRED: &str = "Not authorized to access this route";

/// Token signing parameters
#[derive(Debug, Clone)]
pub struct TokenSettings {
    /// HS256 secret
    pub secret: String,

    /// Lifetime of issued tokens
    pub expires_in: Duration,
}

/// Registration input
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(
        required(message = "Please provide a username"),
        length(max = MAX_USERNAME_LENGTH, message = "Username can not be more than 30 characters")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "Please provide an email"),
        email(message = "Please provide a valid email")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Please provide a password"),
        length(min = MIN_PASSWORD_LENGTH, message = "Password must be at least 6 characters")
    )]
    pub password: Option<String>,
}

impl RegisterUser {
    /// Trims username and email, lowercases email; the password is kept verbatim
    fn normalized(self) -> Self {
        Self {
            username: trimmed(self.username),
            email: trimmed(self.email).map(|e| e.to_lowercase()),
            password: self.password.filter(|p| !p.is_empty()),
        }
    }
}

/// Login input
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginUser {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Users, passwords and session tokens
#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn Store>,
    tokens: TokenSettings,
}

impl CredentialService {
    pub fn new(store: Arc<dyn Store>, tokens: TokenSettings) -> Self {
        Self { store, tokens }
    }

    /// Lifetime applied to issued tokens and the session cookie
    pub fn token_lifetime(&self) -> Duration {
        self.tokens.expires_in
    }

    /// Creates a user with a hashed password
    ///
    /// # Errors
    ///
    /// - `Validation`: missing field, malformed email, password under 6 characters
    /// - `Conflict`: username or email already taken
    pub async fn register(&self, input: RegisterUser) -> ServiceResult<User> {
        let input = input.normalized();
        input.validate()?;

        let (Some(username), Some(email), Some(password)) =
            (input.username, input.email, input.password)
        else {
            return Err(ServiceError::Validation(
                "Please provide a username, email and password".to_string(),
            ));
        };

        if self.store.find_user_by_username(&username).await?.is_some() {
            return Err(ServiceError::Conflict(
                "A user with that username already exists".to_string(),
            ));
        }
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict(
                "A user with that email already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&password)?;

        // A concurrent registration can still lose the race; the store
        // reports that as a unique violation.
        let user = self
            .store
            .create_user(CreateUser {
                username,
                email,
                password_hash,
                avatar: None,
            })
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Verifies an email/password pair
    ///
    /// # Errors
    ///
    /// - `Validation`: email or password missing
    /// - `Unauthenticated`: unknown email or wrong password, indistinguishably
    pub async fn authenticate(&self, input: LoginUser) -> ServiceResult<User> {
        let email = trimmed(input.email).map(|e| e.to_lowercase());
        let password = input.password.filter(|p| !p.is_empty());

        let (Some(email), Some(password)) = (email, password) else {
            return Err(ServiceError::Validation(
                "Please provide an email and password".to_string(),
            ));
        };

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            debug!("Login attempt for unknown email");
            return Err(ServiceError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        };

        if !verify_password(&password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(ServiceError::Unauthenticated(INVALID_CREDENTIALS.to_string()));
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Signs a session token for the user
    pub fn issue_token(&self, user: &User) -> ServiceResult<String> {
        let claims = Claims::new(user.id, self.tokens.expires_in);
        Ok(create_token(&claims, &self.tokens.secret)?)
    }

    pub async fn get_by_id(&self, id: Uuid) -> ServiceResult<Option<User>> {
        Ok(self.store.find_user(id).await?)
    }

    /// Verifies a token and loads the user it names
    ///
    /// A valid token for a user that no longer exists is rejected the same way
    /// as an invalid token.
    pub async fn resolve_session(&self, token: &str) -> ServiceResult<Actor> {
        let claims = validate_token(token, &self.tokens.secret)?;

        match self.get_by_id(claims.sub).await? {
            Some(user) => Ok(Actor::from(user)),
            None => {
                debug!(user_id = %claims.sub, "Token names a missing user");
                Err(ServiceError::Unauthenticated(SESSION_REQUIRED.to_string()))
            }
        }
    }
}
