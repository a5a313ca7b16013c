//! v1 Project handlers: the public gallery and admin CRUD.

use axum::extract::{Path, State};

use crate::api::v1::dto::{
    CreateProjectRequest, ListProjectsResponse, ProjectResponse, UpdateProjectRequest,
};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::{AppJson, AppState};

/// `GET /api/v1/projects`
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    tag = "projects",
    operation_id = "projects.list",
    responses(
        (status = 200, description = "Visible projects, newest first", body = ListProjectsResponse),
    )
)]
pub async fn list_projects(State(state): State<AppState>) -> ApiResponse<ListProjectsResponse> {
    list(&state, true).await
}

/// `GET /api/v1/projects/{projectId}`
#[utoipa::path(
    get,
    path = "/api/v1/projects/{projectId}",
    tag = "projects",
    operation_id = "projects.get",
    params(("projectId" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project found", body = ProjectResponse),
        (status = 404, description = "Project not found or hidden", body = ApiError),
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<ProjectResponse> {
    match state.catalog.get_project(&id, true).await {
        Ok(project) => ApiResponse::success(project.into()),
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/admin/projects`
#[utoipa::path(
    get,
    path = "/api/v1/admin/projects",
    tag = "admin",
    operation_id = "admin.projects.list",
    responses(
        (status = 200, description = "All projects including hidden", body = ListProjectsResponse),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_list_projects(
    State(state): State<AppState>,
) -> ApiResponse<ListProjectsResponse> {
    list(&state, false).await
}

/// `GET /api/v1/admin/projects/{projectId}`
#[utoipa::path(
    get,
    path = "/api/v1/admin/projects/{projectId}",
    tag = "admin",
    operation_id = "admin.projects.get",
    params(("projectId" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project found", body = ProjectResponse),
        (status = 404, description = "Project not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<ProjectResponse> {
    match state.catalog.get_project(&id, false).await {
        Ok(project) => ApiResponse::success(project.into()),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/admin/projects`
#[utoipa::path(
    post,
    path = "/api/v1/admin/projects",
    tag = "admin",
    operation_id = "admin.projects.create",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = ProjectResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateProjectRequest>,
) -> ApiResponse<ProjectResponse> {
    match state.catalog.create_project(req.into()).await {
        Ok(project) => ApiResponse::created(project.into()),
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/admin/projects/{projectId}`
#[utoipa::path(
    patch,
    path = "/api/v1/admin/projects/{projectId}",
    tag = "admin",
    operation_id = "admin.projects.update",
    params(("projectId" = String, Path, description = "Project ID")),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated", body = ProjectResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Project not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateProjectRequest>,
) -> ApiResponse<ProjectResponse> {
    match state.catalog.update_project(&id, req.into()).await {
        Ok(project) => ApiResponse::success(project.into()),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/admin/projects/{projectId}`
#[utoipa::path(
    delete,
    path = "/api/v1/admin/projects/{projectId}",
    tag = "admin",
    operation_id = "admin.projects.delete",
    params(("projectId" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 404, description = "Project not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    match state.catalog.delete_project(&id).await {
        Ok(()) => ApiResponse::success(()),
        Err(e) => e.into(),
    }
}

async fn list(state: &AppState, visible_only: bool) -> ApiResponse<ListProjectsResponse> {
    match state.catalog.list_projects(visible_only).await {
        Ok(projects) => {
            let meta = ResponseMeta::total(projects.len());
            ApiResponse::success_with_meta(
                ListProjectsResponse {
                    projects: projects.into_iter().map(Into::into).collect(),
                },
                meta,
            )
        }
        Err(e) => e.into(),
    }
}
