use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::embeddings::EmbeddingProvider;
use crate::llm::LlmProvider;
use crate::services::{CatalogService, PromptLogger, ResponseComposer};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub embeddings: EmbeddingProvider,
    pub llm: LlmProvider,
    pub composer: ResponseComposer,
    pub catalog: CatalogService,
    pub prompt_log: PromptLogger,
}

impl AppState {
    pub fn new(
        config: Config,
        db: Arc<dyn DatabaseBackend>,
        embeddings: EmbeddingProvider,
        llm: LlmProvider,
    ) -> Self {
        let config = Arc::new(config);
        let composer = ResponseComposer::new(
            db.clone(),
            embeddings.clone(),
            llm.clone(),
            &config.retrieval,
        );
        let catalog = CatalogService::new(db.clone(), embeddings.clone());
        let prompt_log = PromptLogger::new(db.clone());

        Self {
            config,
            db,
            embeddings,
            llm,
            composer,
            catalog,
            prompt_log,
        }
    }
}
