use axum::http::Uri;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::v1;
use super::v1::response::{ApiResponse, ErrorCode};
use super::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Public chat widget and gallery, plus the admin API, all under `/api/v1`.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let v1 = v1::router::v1_router(state.clone());

    Router::new()
        .nest("/api/v1", v1)
        .fallback(unknown_route)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn unknown_route(uri: Uri) -> ApiResponse<()> {
    ApiResponse::error(ErrorCode::NotFound, format!("No route for {}", uri.path()))
}
