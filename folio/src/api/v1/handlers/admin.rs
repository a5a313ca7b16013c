//! v1 Admin maintenance handlers.

use axum::extract::State;

use crate::api::v1::dto::ReembedResponse;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::AppState;

/// `POST /api/v1/admin/embeddings:rebuild`
#[utoipa::path(
    post,
    path = "/api/v1/admin/embeddings:rebuild",
    tag = "admin",
    operation_id = "admin.embeddings.rebuild",
    responses(
        (status = 200, description = "Embeddings regenerated", body = ReembedResponse),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn rebuild_embeddings(State(state): State<AppState>) -> ApiResponse<ReembedResponse> {
    match state.catalog.reembed_all().await {
        Ok(summary) => ApiResponse::success(summary.into()),
        Err(e) => e.into(),
    }
}
