use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::info;

use workspace_db::models::WorkspaceChanges;
use workspace_types::Patch;
use workspace_types::api::{
    CreateWorkspaceRequest, CreateWorkspaceResponse, DeleteWorkspaceResponse,
    ListWorkspacesQuery, UpdateWorkspaceRequest,
};
use workspace_types::models::Workspace;

use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::state::AppState;

/// GET /api/v1/workspace[?creator_id=]
///
/// The query string is read as loose pairs so repeated or unknown keys never
/// reject the request.
pub async fn list_workspaces(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Workspace>>, ApiError> {
    let query = ListWorkspacesQuery::from_pairs(pairs);
    let creator_id = query.creator_filter().map(str::to_owned);

    let rows = state
        .run_db(move |db| db.list_workspaces(creator_id.as_deref()))
        .await?;

    Ok(Json(rows.into_iter().map(Workspace::from).collect()))
}

/// GET /api/v1/workspace/{id}
pub async fn get_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Workspace>, ApiError> {
    let row = state
        .run_db(move |db| db.get_workspace(&id))
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(row.into()))
}

/// POST /api/v1/workspace
pub async fn create_workspace(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateWorkspaceRequest>,
) -> Result<Json<CreateWorkspaceResponse>, ApiError> {
    let id = state
        .run_db(move |db| db.create_workspace(&req.name, req.creator_id.as_deref()))
        .await?;

    info!("Workspace {} created", id);
    Ok(Json(CreateWorkspaceResponse { id }))
}

/// PATCH /api/v1/workspace/{id}. Only keys present in the body are written.
pub async fn update_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateWorkspaceRequest>,
) -> Result<StatusCode, ApiError> {
    let changes = changes_from_request(req)?;

    let found = state
        .run_db(move |db| db.update_workspace(&id, &changes))
        .await?;

    if !found {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/workspace/{id}
pub async fn delete_workspace(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteWorkspaceResponse>, ApiError> {
    let deleted_id = state
        .run_db(move |db| db.delete_workspace(&id))
        .await?
        .ok_or(ApiError::NotFound)?;

    info!("Workspace {} deleted", deleted_id);
    Ok(Json(DeleteWorkspaceResponse { deleted_id }))
}

fn changes_from_request(req: UpdateWorkspaceRequest) -> Result<WorkspaceChanges, ApiError> {
    if req.is_empty() {
        return Err(ApiError::BadRequest("no fields to update".into()));
    }

    let name = match req.name {
        Patch::Absent => None,
        Patch::Null => return Err(ApiError::BadRequest("name cannot be null".into())),
        Patch::Value(name) => Some(name),
    };

    Ok(WorkspaceChanges {
        name,
        editor_id: req.editor_id.into_option(),
    })
}
