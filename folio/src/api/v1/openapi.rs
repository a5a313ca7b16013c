use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Folio API",
        version = "1.0.0",
        description = "Portfolio backend. Retrieval-augmented chat over projects and curated content, plus the project gallery and admin catalog.",
    ),
    paths(
        handlers::health::health_check,
        handlers::chat::send_message,
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::admin_list_projects,
        handlers::projects::admin_get_project,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::content::list_content_entries,
        handlers::content::get_content_entry,
        handlers::content::create_content_entry,
        handlers::content::update_content_entry,
        handlers::content::delete_content_entry,
        handlers::tags::list_tags,
        handlers::prompts::list_prompts,
        handlers::admin::rebuild_embeddings,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Common
        dto::common::V1ContentCategory,
        // Chat
        dto::chat::ChatRequest,
        dto::chat::ChatResponse,
        dto::chat::ChatReplyResponse,
        dto::chat::ChatMessageResponse,
        dto::chat::SuggestionResponse,
        dto::chat::V1Sender,
        // Projects
        dto::projects::ProjectImageDto,
        dto::projects::CreateProjectRequest,
        dto::projects::UpdateProjectRequest,
        dto::projects::ProjectResponse,
        dto::projects::ListProjectsResponse,
        dto::projects::TagResponse,
        dto::projects::ListTagsResponse,
        // Content
        dto::content::CreateContentEntryRequest,
        dto::content::UpdateContentEntryRequest,
        dto::content::ContentEntryResponse,
        dto::content::ListContentEntriesResponse,
        // Admin
        dto::admin::ReembedResponse,
        dto::admin::ListPromptsQuery,
        dto::admin::PromptLogResponse,
        dto::admin::ListPromptLogsResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::BackendStatus,
        handlers::health::EmbeddingsStatus,
        handlers::health::LlmStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "chat", description = "Chat widget replies"),
        (name = "projects", description = "Public project gallery"),
        (name = "content", description = "Curated chat context (auth required)"),
        (name = "admin", description = "Catalog administration and maintenance (auth required)"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
