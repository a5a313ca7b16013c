use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::admin_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let content = Router::new()
        .route(
            "/",
            get(handlers::content::list_content_entries)
                .post(handlers::content::create_content_entry),
        )
        .route(
            "/{contentId}",
            get(handlers::content::get_content_entry)
                .patch(handlers::content::update_content_entry)
                .delete(handlers::content::delete_content_entry),
        );

    let projects = Router::new()
        .route(
            "/",
            get(handlers::projects::admin_list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/{projectId}",
            get(handlers::projects::admin_get_project)
                .patch(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        );

    let admin = Router::new()
        .nest("/content", content)
        .nest("/projects", projects)
        .route("/tags", get(handlers::tags::list_tags))
        .route("/prompts", get(handlers::prompts::list_prompts))
        .route(
            "/embeddings:rebuild",
            post(handlers::admin::rebuild_embeddings),
        )
        .route_layer(middleware::from_fn_with_state(state, admin_auth_middleware));

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
        .route("/chat", post(handlers::chat::send_message))
        .route("/projects", get(handlers::projects::list_projects))
        .route("/projects/{projectId}", get(handlers::projects::get_project));

    Router::new().merge(public_routes).nest("/admin", admin)
}
