/// Task endpoints
///
/// Tasks are created and listed under their project and updated or deleted
/// by id. The owner and every member of the parent project have full access.

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
    services::{NewTask, TaskPatch, TaskView},
};

/// `GET /api/projects/:id/tasks`
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(project_id): Path<String>,
) -> ApiResult<Json<Envelope<Vec<TaskView>>>> {
    let project_id = parse_id(&project_id, "Project")?;
    let tasks = state.services.tasks.list(project_id, &actor).await?;
    Ok(Envelope::list(tasks))
}

/// `POST /api/projects/:id/tasks`
///
/// ```text
/// { "title": "Write docs", "priority": "High", "assignedTo": null }
/// ```
pub async fn create_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(project_id): Path<String>,
    ApiJson(req): ApiJson<NewTask>,
) -> ApiResult<(StatusCode, Json<Envelope<TaskView>>)> {
    let project_id = parse_id(&project_id, "Project")?;
    let task = state.services.tasks.create(project_id, &actor, req).await?;
    Ok(Envelope::created(task))
}

/// `PUT /api/tasks/:id`
pub async fn update_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TaskPatch>,
) -> ApiResult<Json<Envelope<TaskView>>> {
    let id = parse_id(&id, "Task")?;
    let task = state.services.tasks.update(id, &actor, req).await?;
    Ok(Envelope::ok(task))
}

/// `DELETE /api/tasks/:id`
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Value>>> {
    let id = parse_id(&id, "Task")?;
    state.services.tasks.delete(id, &actor).await?;
    Ok(empty())
}
