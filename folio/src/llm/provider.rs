use std::sync::Arc;

use tracing::warn;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{FolioError, Result};
use crate::llm::api::{LlmApiClient, LlmProxyClient};
use crate::models::ChatTurn;

/// Returned to the visitor whenever a completion cannot be produced.
pub const COMPLETION_FAILURE_MESSAGE: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again later.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    Proxy { url: String },
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

#[derive(Clone)]
enum LlmClient {
    Proxy(LlmProxyClient),
    Api(LlmApiClient),
}

/// Chat completion with a single attempt per call.
#[derive(Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    config: Option<Arc<LlmConfig>>,
    client: Option<LlmClient>,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided");
        };

        if let Some(url) = &config.url {
            return match LlmProxyClient::new(config, url) {
                Ok(client) => Self {
                    backend: LlmBackend::Proxy { url: url.clone() },
                    config: Some(Arc::new(config.clone())),
                    client: Some(LlmClient::Proxy(client)),
                },
                Err(e) => Self::unavailable(&e.to_string()),
            };
        }

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            _ => match &config.base_url {
                Some(base_url) => LlmBackend::OpenAICompatible {
                    base_url: base_url.clone(),
                },
                None => {
                    return Self::unavailable(&format!(
                        "Model '{}' has no provider prefix and LLM_URL is not set",
                        config.model
                    ))
                }
            },
        };

        match LlmApiClient::new(config) {
            Ok(client) => Self {
                backend,
                config: Some(Arc::new(config.clone())),
                client: Some(LlmClient::Api(client)),
            },
            Err(e) => {
                warn!(error = %e, "LLM client could not be created");
                Self::unavailable(&e.to_string())
            }
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: None,
            client: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.client.is_some()
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn config(&self) -> Option<&LlmConfig> {
        self.config.as_deref()
    }

    pub fn base_url(&self) -> Option<&str> {
        match (&self.backend, &self.client) {
            (LlmBackend::Proxy { url }, _) => Some(url),
            (_, Some(LlmClient::Api(client))) => Some(client.base_url()),
            _ => None,
        }
    }

    /// Generate a reply, or [`COMPLETION_FAILURE_MESSAGE`] on any failure.
    pub async fn complete(&self, messages: &[ChatTurn]) -> String {
        match self.try_complete(messages).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Completion failed");
                COMPLETION_FAILURE_MESSAGE.to_string()
            }
        }
    }

    pub async fn try_complete(&self, messages: &[ChatTurn]) -> Result<String> {
        match &self.client {
            Some(LlmClient::Proxy(client)) => client.complete(messages).await,
            Some(LlmClient::Api(client)) => client.complete(messages).await,
            None => Err(FolioError::LlmUnavailable(self.unavailable_reason())),
        }
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "LLM client not initialised".to_string(),
        }
    }
}
