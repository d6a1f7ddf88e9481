/// Project endpoints
///
/// All routes require a session. Reads are open to the owner and members;
/// update, delete and add-member are owner-only.

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
    models::project::Project,
    services::{AddMember, NewProject, ProjectDetail, ProjectListItem, ProjectPatch, ProjectStats},
};

const ENTITY: &str = "Project";

/// `GET /api/projects`
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Json<Envelope<Vec<ProjectListItem>>>> {
    let projects = state.services.projects.list(&actor).await?;
    Ok(Envelope::list(projects))
}

/// `POST /api/projects`
pub async fn create_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    ApiJson(req): ApiJson<NewProject>,
) -> ApiResult<(StatusCode, Json<Envelope<Project>>)> {
    let project = state.services.projects.create(&actor, req).await?;
    Ok(Envelope::created(project))
}

/// `GET /api/projects/:id`
pub async fn get_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<ProjectDetail>>> {
    let id = parse_id(&id, ENTITY)?;
    let project = state.services.projects.get(id, &actor).await?;
    Ok(Envelope::ok(project))
}

/// `PUT /api/projects/:id`
pub async fn update_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<ProjectPatch>,
) -> ApiResult<Json<Envelope<Project>>> {
    let id = parse_id(&id, ENTITY)?;
    let project = state.services.projects.update(id, &actor, req).await?;
    Ok(Envelope::ok(project))
}

/// `DELETE /api/projects/:id`
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Value>>> {
    let id = parse_id(&id, ENTITY)?;
    state.services.projects.delete(id, &actor).await?;
    Ok(empty())
}

/// `PUT /api/projects/:id/add-member` with `{ "email": "..." }`
pub async fn add_member(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<AddMember>,
) -> ApiResult<Json<Envelope<ProjectDetail>>> {
    let id = parse_id(&id, ENTITY)?;
    let project = state.services.projects.add_member(id, &actor, req).await?;
    Ok(Envelope::ok(project))
}

/// `GET /api/projects/:id/stats`
pub async fn project_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<ProjectStats>>> {
    let id = parse_id(&id, ENTITY)?;
    let stats = state.services.projects.stats(id, &actor).await?;
    Ok(Envelope::ok(stats))
}
