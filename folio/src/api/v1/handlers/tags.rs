//! v1 Tag handlers (admin only).

use axum::extract::State;

use crate::api::v1::dto::ListTagsResponse;
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;

/// `GET /api/v1/admin/tags`
#[utoipa::path(
    get,
    path = "/api/v1/admin/tags",
    tag = "admin",
    operation_id = "admin.tags.list",
    responses(
        (status = 200, description = "Tag dictionary", body = ListTagsResponse),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_tags(State(state): State<AppState>) -> ApiResponse<ListTagsResponse> {
    match state.catalog.list_tags().await {
        Ok(tags) => {
            let meta = ResponseMeta::total(tags.len());
            ApiResponse::success_with_meta(
                ListTagsResponse {
                    tags: tags.into_iter().map(Into::into).collect(),
                },
                meta,
            )
        }
        Err(e) => e.into(),
    }
}
