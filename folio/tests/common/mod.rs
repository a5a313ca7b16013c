#![allow(dead_code)]

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use folio::config::{EmbeddingsConfig, LlmConfig, RetrievalConfig};
use folio::db::MemoryBackend;
use folio::embeddings::EmbeddingProvider;
use folio::llm::LlmProvider;
use folio::models::{CreateContentEntryRequest, CreateProjectRequest, ContentCategory};
use folio::services::{CatalogService, ResponseComposer};

/// Axes of the fake embedding space. A text gets 1.0 on every axis whose
/// term it mentions, plus a small constant so no vector is all zeros.
pub const EMBEDDING_AXES: &[&str] = &["rust", "clinic", "garden"];
pub const EMBEDDING_DIMENSIONS: usize = 4;

pub fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("folio=debug")
        .with_test_writer()
        .try_init();
}

/// Deterministic embedding proxy: `POST {text}` -> `{embedding}`.
pub struct KeywordEmbedder;

impl Respond for KeywordEmbedder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap_or_default();
        let text = body["text"].as_str().unwrap_or_default().to_lowercase();

        let mut embedding: Vec<f32> = EMBEDDING_AXES
            .iter()
            .map(|term| if text.contains(term) { 1.0 } else { 0.0 })
            .collect();
        embedding.push(0.05);

        ResponseTemplate::new(200).set_body_json(json!({ "embedding": embedding }))
    }
}

pub async fn mount_embedding_proxy(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/functions/v1/embed"))
        .respond_with(KeywordEmbedder)
        .mount(server)
        .await;
}

pub async fn mount_completion_proxy(server: &MockServer, generated_text: &str) {
    Mock::given(method("POST"))
        .and(path("/functions/v1/complete"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "generatedText": generated_text })),
        )
        .mount(server)
        .await;
}

pub async fn mount_failing_completion_proxy(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/functions/v1/complete"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(server)
        .await;
}

pub fn embedding_provider(server: &MockServer) -> EmbeddingProvider {
    EmbeddingProvider::new(&EmbeddingsConfig {
        model: "proxy".to_string(),
        url: Some(format!("{}/functions/v1/embed", server.uri())),
        api_key: None,
        base_url: None,
        dimensions: EMBEDDING_DIMENSIONS,
        timeout_secs: 5,
        cache_size: 0,
    })
    .expect("embedding provider")
}

pub fn llm_provider(server: &MockServer) -> LlmProvider {
    LlmProvider::new(Some(&LlmConfig {
        model: "gpt-4o-mini".to_string(),
        url: Some(format!("{}/functions/v1/complete", server.uri())),
        api_key: None,
        base_url: None,
        timeout_secs: 5,
    }))
}

pub fn retrieval_config() -> RetrievalConfig {
    RetrievalConfig {
        call_timeout_secs: 5,
        ..RetrievalConfig::default()
    }
}

/// Catalog and composer sharing one in-memory store.
pub struct Harness {
    pub db: Arc<MemoryBackend>,
    pub catalog: CatalogService,
    pub composer: ResponseComposer,
}

impl Harness {
    pub fn new(embeddings: EmbeddingProvider, llm: LlmProvider) -> Self {
        let db = Arc::new(MemoryBackend::new());
        let catalog = CatalogService::new(db.clone(), embeddings.clone());
        let composer = ResponseComposer::new(db.clone(), embeddings, llm, &retrieval_config());
        Self {
            db,
            catalog,
            composer,
        }
    }

    /// No embedding or completion endpoints.
    pub fn offline() -> Self {
        Self::new(
            EmbeddingProvider::unavailable(EMBEDDING_DIMENSIONS),
            LlmProvider::unavailable("not configured in tests"),
        )
    }

    pub async fn add_project(&self, request: CreateProjectRequest) -> String {
        self.catalog
            .create_project(request)
            .await
            .expect("create project")
            .id
    }

    pub async fn add_content(&self, title: &str, content: &str) -> String {
        self.catalog
            .create_content_entry(CreateContentEntryRequest {
                title: title.to_string(),
                content: content.to_string(),
                category: ContentCategory::Skill,
                visible: None,
            })
            .await
            .expect("create content entry")
            .id
    }
}

pub fn project(title: &str, year: i32) -> CreateProjectRequest {
    CreateProjectRequest {
        title: title.to_string(),
        client: None,
        description: None,
        year: Some(year),
        involvement: None,
        live_url: None,
        tags: Vec::new(),
        primary_image: None,
        images: Vec::new(),
        visible: None,
    }
}

pub fn hidden(mut request: CreateProjectRequest) -> CreateProjectRequest {
    request.visible = Some(false);
    request
}

pub fn described(mut request: CreateProjectRequest, description: &str) -> CreateProjectRequest {
    request.description = Some(description.to_string());
    request
}

pub fn tagged(mut request: CreateProjectRequest, tags: &[&str]) -> CreateProjectRequest {
    request.tags = tags.iter().map(|t| t.to_string()).collect();
    request
}
