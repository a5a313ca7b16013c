//! v1 Content entry handlers (admin only).

use axum::extract::{Path, State};

use crate::api::v1::dto::{
    ContentEntryResponse, CreateContentEntryRequest, ListContentEntriesResponse,
    UpdateContentEntryRequest,
};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::{AppJson, AppState};

/// `GET /api/v1/admin/content`
#[utoipa::path(
    get,
    path = "/api/v1/admin/content",
    tag = "content",
    operation_id = "content.list",
    responses(
        (status = 200, description = "All content entries, most recently updated first", body = ListContentEntriesResponse),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_content_entries(
    State(state): State<AppState>,
) -> ApiResponse<ListContentEntriesResponse> {
    match state.catalog.list_content_entries().await {
        Ok(entries) => {
            let meta = ResponseMeta::total(entries.len());
            ApiResponse::success_with_meta(
                ListContentEntriesResponse {
                    entries: entries.into_iter().map(Into::into).collect(),
                },
                meta,
            )
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/admin/content/{contentId}`
#[utoipa::path(
    get,
    path = "/api/v1/admin/content/{contentId}",
    tag = "content",
    operation_id = "content.get",
    params(("contentId" = String, Path, description = "Content entry ID")),
    responses(
        (status = 200, description = "Content entry found", body = ContentEntryResponse),
        (status = 404, description = "Content entry not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_content_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<ContentEntryResponse> {
    match state.catalog.get_content_entry(&id).await {
        Ok(entry) => ApiResponse::success(entry.into()),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/admin/content`
#[utoipa::path(
    post,
    path = "/api/v1/admin/content",
    tag = "content",
    operation_id = "content.create",
    request_body = CreateContentEntryRequest,
    responses(
        (status = 201, description = "Content entry created", body = ContentEntryResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_content_entry(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateContentEntryRequest>,
) -> ApiResponse<ContentEntryResponse> {
    match state.catalog.create_content_entry(req.into()).await {
        Ok(entry) => ApiResponse::created(entry.into()),
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/admin/content/{contentId}`
#[utoipa::path(
    patch,
    path = "/api/v1/admin/content/{contentId}",
    tag = "content",
    operation_id = "content.update",
    params(("contentId" = String, Path, description = "Content entry ID")),
    request_body = UpdateContentEntryRequest,
    responses(
        (status = 200, description = "Content entry updated", body = ContentEntryResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Content entry not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_content_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateContentEntryRequest>,
) -> ApiResponse<ContentEntryResponse> {
    match state.catalog.update_content_entry(&id, req.into()).await {
        Ok(entry) => ApiResponse::success(entry.into()),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/admin/content/{contentId}`
#[utoipa::path(
    delete,
    path = "/api/v1/admin/content/{contentId}",
    tag = "content",
    operation_id = "content.delete",
    params(("contentId" = String, Path, description = "Content entry ID")),
    responses(
        (status = 200, description = "Content entry deleted"),
        (status = 404, description = "Content entry not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_content_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    match state.catalog.delete_content_entry(&id).await {
        Ok(()) => ApiResponse::success(()),
        Err(e) => e.into(),
    }
}
