/// Session middleware
///
/// Reads the session token from `Authorization: Bearer <token>` or, failing
/// that, the `token` cookie. The verified [`Actor`] is inserted into request
/// extensions for handlers to pick up with `Extension<Actor>`.
///
/// Missing, invalid and expired tokens, and tokens naming a deleted user, all
/// answer 401 before any handler runs.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use cookie::Cookie;
use taskflow_shared::auth::actor::Actor;
use tracing::debug;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};

/// Cookie carrying the session token
pub const SESSION_COOKIE: &str = "token";

const NOT_AUTHORIZED: &str = "Not authorized to access this route";

/// Rejects the request unless it carries a valid session
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some(token) = session_token(req.headers()) else {
        debug!(path = %req.uri().path(), "Request without session token");
        return Err(ApiError::Unauthorized(NOT_AUTHORIZED.to_string()));
    };

    let actor: Actor = state.services.credentials.resolve_session(&token).await?;
    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}

/// Bearer header first, then the session cookie
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else {
            continue;
        };
        for cookie in Cookie::split_parse(raw).flatten() {
            if cookie.name() == SESSION_COOKIE && !cookie.value().is_empty() {
                return Some(cookie.value().to_string());
            }
        }
    }

    None
}
