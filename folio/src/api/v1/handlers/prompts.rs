//! v1 Prompt log handlers (admin only).

use axum::extract::State;
use axum_extra::extract::Query;

use crate::api::v1::dto::{ListPromptLogsResponse, ListPromptsQuery};
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::AppState;

const DEFAULT_LIMIT: u32 = 100;

/// `GET /api/v1/admin/prompts`
#[utoipa::path(
    get,
    path = "/api/v1/admin/prompts",
    tag = "admin",
    operation_id = "admin.prompts.list",
    params(ListPromptsQuery),
    responses(
        (status = 200, description = "Visitor prompts, newest first", body = ListPromptLogsResponse),
        (status = 401, description = "Missing or invalid API key", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_prompts(
    State(state): State<AppState>,
    Query(query): Query<ListPromptsQuery>,
) -> ApiResponse<ListPromptLogsResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    match state.prompt_log.list(limit).await {
        Ok(logs) => {
            let meta = ResponseMeta::total(logs.len());
            ApiResponse::success_with_meta(
                ListPromptLogsResponse {
                    prompts: logs.into_iter().map(Into::into).collect(),
                },
                meta,
            )
        }
        Err(e) => e.into(),
    }
}
