/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - create an account and start a session
/// - `POST /api/auth/login` - start a session
/// - `GET /api/auth/logout` - overwrite the session cookie
/// - `GET /api/auth/me` - current user
///
/// Register and login return the token in the body and also set it as the
/// `token` cookie (`HttpOnly`, `Path=/`, `Secure` in production).

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    middleware::session::SESSION_COOKIE,
    response::{empty, Envelope},
};
use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use cookie::{Cookie, SameSite};
use serde::Serialize;
use taskflow_shared::{
    auth::actor::Actor,
    models::user::{User, UserProfile},
    services::{LoginUser, RegisterUser},
};
use time::Duration as CookieDuration;

/// Seconds the overwritten cookie survives after logout
const LOGOUT_COOKIE_SECONDS: i64 = 10;

/// Register and login response
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub success: bool,
    pub token: String,
    pub user: UserProfile,
}

/// Register a new user
///
/// ```text
/// POST /api/auth/register
/// { "username": "alice", "email": "alice@example.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed, or username/email taken
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterUser>,
) -> ApiResult<Response> {
    let user = state.services.credentials.register(req).await?;
    session_response(&state, &user, StatusCode::CREATED)
}

/// Login with email and password
///
/// # Errors
///
/// - `400 Bad Request`: email or password missing
/// - `401 Unauthorized`: invalid credentials
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginUser>,
) -> ApiResult<Response> {
    let user = state.services.credentials.authenticate(req).await?;
    session_response(&state, &user, StatusCode::OK)
}

/// Replace the session cookie with a short-lived placeholder
pub async fn logout(State(state): State<AppState>) -> ApiResult<Response> {
    let cookie = session_cookie(
        "none".to_string(),
        CookieDuration::seconds(LOGOUT_COOKIE_SECONDS),
        state.config.api.production,
    );

    with_cookie(empty().into_response(), &cookie)
}

/// The authenticated user
pub async fn me(Extension(actor): Extension<Actor>) -> Json<Envelope<UserProfile>> {
    Envelope::ok(actor.profile())
}

fn session_response(state: &AppState, user: &User, status: StatusCode) -> ApiResult<Response> {
    let token = state.services.credentials.issue_token(user)?;
    let lifetime = state.services.credentials.token_lifetime();

    let cookie = session_cookie(
        token.clone(),
        CookieDuration::seconds(lifetime.num_seconds()),
        state.config.api.production,
    );

    let body = Json(SessionResponse {
        success: true,
        token,
        user: UserProfile::from(user),
    });

    with_cookie((status, body).into_response(), &cookie)
}

fn session_cookie(value: String, max_age: CookieDuration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

fn with_cookie(mut response: Response, cookie: &Cookie<'_>) -> ApiResult<Response> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie header: {}", e)))?;
    response.headers_mut().append(header::SET_COOKIE, value);
    Ok(response)
}
