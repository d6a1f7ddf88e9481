/// Comment endpoints

use crate::{
    app::AppState,
    error::ApiResult,
    extract::{parse_id, ApiJson},
    response::{empty, Envelope},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;
use taskflow_shared::{
    auth::actor::Actor,
    services::{CommentView, NewComment},
};

/// `GET /api/tasks/:id/comments`, newest first
pub async fn list_comments(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<CommentView>>>> {
    let task_id = parse_id(&task_id, "Task")?;
    let comments = state.services.comments.list_for_task(task_id, &actor).await?;
    Ok(Envelope::list(comments))
}

/// `POST /api/tasks/:id/comments` with `{ "text": "..." }`
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(task_id): Path<String>,
    ApiJson(req): ApiJson<NewComment>,
) -> ApiResult<(StatusCode, Json<Envelope<CommentView>>)> {
    let task_id = parse_id(&task_id, "Task")?;
    let comment = state.services.comments.add(task_id, &actor, req).await?;
    Ok(Envelope::created(comment))
}

/// `DELETE /api/comments/:id`, author only
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Value>>> {
    let id = parse_id(&id, "Comment")?;
    state.services.comments.delete(id, &actor).await?;
    Ok(empty())
}
