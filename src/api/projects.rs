use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::response::ApiResponse;
use crate::auth::token::AdminClaims;
use crate::error::AppError;
use crate::models::file_tree::{build_file_tree, TreeNode};
use crate::models::parse_object_id;
use crate::models::project::{
    validate_project_files, CreateProjectRequest, Project, ProjectFile, UpdateProjectRequest,
};
use crate::state::AppState;

/// `GET /api/projects`
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Project>>>, AppError> {
    let projects = state.projects.list().await?;
    Ok(Json(ApiResponse::ok(
        "Projects retrieved successfully",
        projects,
    )))
}

/// `GET /api/projects/{id}`
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    let id = parse_object_id(&id, "project")?;
    let project = state
        .projects
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(Json(ApiResponse::ok(
        "Project retrieved successfully",
        project,
    )))
}

/// `POST /api/projects`
pub async fn create_project(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Project>>), AppError> {
    let project = Project::from_request(req)?;
    let project = state.projects.create(project).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Project created successfully", project)),
    ))
}

/// `PUT /api/projects/{id}`
pub async fn update_project(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<ApiResponse<Project>>, AppError> {
    let id = parse_object_id(&id, "project")?;
    req.validate()?;

    let project = state
        .projects
        .update(id, &req)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(Json(ApiResponse::ok(
        "Project updated successfully",
        project,
    )))
}

/// `DELETE /api/projects/{id}`
pub async fn delete_project(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let id = parse_object_id(&id, "project")?;
    let project = state
        .projects
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    let deleted_id = project.id.map(|oid| oid.to_hex()).unwrap_or_default();
    Ok(Json(ApiResponse::ok(
        "Project deleted successfully",
        serde_json::json!({ "id": deleted_id }),
    )))
}

#[derive(Debug, Deserialize)]
pub struct ReplaceFilesRequest {
    pub files: Vec<ProjectFile>,
}

/// `POST /api/projects/{id}/files` — swap the embedded file list wholesale.
pub async fn replace_project_files(
    State(state): State<AppState>,
    _claims: AdminClaims,
    Path(id): Path<String>,
    Json(req): Json<ReplaceFilesRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let id = parse_object_id(&id, "project")?;
    validate_project_files(&req.files)?;

    let count = state
        .projects
        .replace_files(id, req.files)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    Ok(Json(ApiResponse::ok(
        &format!("Uploaded {count} file(s)"),
        serde_json::json!({ "projectId": id.to_hex(), "fileCount": count }),
    )))
}

/// `GET /api/projects/{id}/tree` — the code-viewer tree built from the
/// embedded file list.
pub async fn get_project_tree(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TreeNode>>, AppError> {
    let id = parse_object_id(&id, "project")?;
    let project = state
        .projects
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

    let tree = build_file_tree(&project.files);
    Ok(Json(ApiResponse::ok(
        "Project tree retrieved successfully",
        tree,
    )))
}
