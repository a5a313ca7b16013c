use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn env_opt(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub embeddings: EmbeddingsConfig,
    pub llm: Option<LlmConfig>,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer keys guarding the admin routes. Empty leaves admin open.
    pub api_keys: Vec<String>,
}

/// Hosted Postgres exposed through a PostgREST-compatible API.
/// `url = None` selects the in-memory store.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    /// `proxy` for the serverless function, or `provider/model`
    /// (e.g. `openai/text-embedding-3-small`) for an OpenAI-compatible API.
    pub model: String,
    /// Embedding proxy function endpoint.
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub dimensions: usize,
    pub timeout_secs: u64,
    pub cache_size: usize,
}

/// LLM configuration for chat/completion models
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    /// Completion proxy function endpoint. Takes precedence over `base_url`.
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    pub content_threshold: f32,
    pub content_limit: u32,
    pub project_threshold: f32,
    pub project_limit: u32,
    /// Average similarity a semantic project result must exceed to be shown.
    pub project_relevance_min_avg: f32,
    /// Per external call.
    pub call_timeout_secs: u64,
    /// Whole chat request.
    pub chat_timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            content_threshold: 0.3,
            content_limit: 5,
            project_threshold: 0.7,
            project_limit: 5,
            project_relevance_min_avg: 0.3,
            call_timeout_secs: 8,
            chat_timeout_secs: 30,
        }
    }
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: "proxy".to_string(),
            url: None,
            api_key: None,
            base_url: None,
            dimensions: 1536,
            timeout_secs: 8,
            cache_size: 256,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let retrieval_defaults = RetrievalConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("FOLIO_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("FOLIO_PORT", 3000),
                api_keys: env::var("FOLIO_API_KEYS")
                    .map(|keys| {
                        keys.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
            },
            backend: BackendConfig {
                url: env_opt("BACKEND_URL"),
                api_key: env_opt("BACKEND_API_KEY"),
                timeout_secs: parse_env_or("BACKEND_TIMEOUT", 10),
            },
            embeddings: EmbeddingsConfig {
                model: env::var("EMBEDDING_MODEL").unwrap_or_else(|_| "proxy".to_string()),
                url: env_opt("EMBEDDING_URL"),
                api_key: env_opt("EMBEDDING_API_KEY"),
                base_url: env_opt("EMBEDDING_BASE_URL"),
                dimensions: parse_env_or("EMBEDDING_DIMENSIONS", 1536),
                timeout_secs: parse_env_or("EMBEDDING_TIMEOUT", 8),
                cache_size: parse_env_or("EMBEDDING_CACHE_SIZE", 256),
            },
            llm: {
                let url = env_opt("LLM_URL");
                let model = env_opt("LLM_MODEL");
                if url.is_some() || model.is_some() {
                    Some(LlmConfig {
                        model: model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
                        url,
                        api_key: env_opt("LLM_API_KEY"),
                        base_url: env_opt("LLM_BASE_URL"),
                        timeout_secs: parse_env_or("LLM_TIMEOUT", 15),
                    })
                } else {
                    None
                }
            },
            retrieval: RetrievalConfig {
                content_threshold: parse_env_or(
                    "CONTENT_MATCH_THRESHOLD",
                    retrieval_defaults.content_threshold,
                ),
                content_limit: parse_env_or("CONTENT_MATCH_LIMIT", retrieval_defaults.content_limit),
                project_threshold: parse_env_or(
                    "PROJECT_MATCH_THRESHOLD",
                    retrieval_defaults.project_threshold,
                ),
                project_limit: parse_env_or("PROJECT_MATCH_LIMIT", retrieval_defaults.project_limit),
                project_relevance_min_avg: parse_env_or(
                    "PROJECT_RELEVANCE_MIN_AVG",
                    retrieval_defaults.project_relevance_min_avg,
                ),
                call_timeout_secs: parse_env_or(
                    "RETRIEVAL_TIMEOUT",
                    retrieval_defaults.call_timeout_secs,
                ),
                chat_timeout_secs: parse_env_or("CHAT_TIMEOUT", retrieval_defaults.chat_timeout_secs),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known embedding providers that use OpenAI-compatible APIs
const KNOWN_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an embedding model name into (provider, model) tuple.
pub fn parse_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    ("proxy", model)
}

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Bare model names go to the completion proxy as-is
    ("proxy", model)
}
