use rand::Rng;
use tracing::{debug, warn};

use super::api::{
    default_base_url, ApiConfig, EmbeddingApiClient, EmbeddingProxyClient, ProxyConfig,
};
use super::cache::EmbeddingCache;
use crate::config::{parse_provider_model, EmbeddingsConfig};
use crate::error::{FolioError, Result};

#[derive(Clone)]
enum EmbeddingBackend {
    Proxy(EmbeddingProxyClient),
    Api(EmbeddingApiClient),
    Unavailable,
}

/// Turns text into fixed-dimension vectors.
///
/// `embed` never fails: any error degrades to a pseudo-random vector so that
/// similarity searches simply come back empty. The write path uses
/// `try_embed` so that stored records are never built from noise.
#[derive(Clone)]
pub struct EmbeddingProvider {
    backend: EmbeddingBackend,
    dimensions: usize,
    cache: EmbeddingCache,
}

impl EmbeddingProvider {
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        let (provider, model_name) = parse_provider_model(&config.model);

        let backend = match provider {
            "proxy" => match &config.url {
                Some(url) => EmbeddingBackend::Proxy(EmbeddingProxyClient::new(ProxyConfig {
                    url: url.clone(),
                    api_key: config.api_key.clone(),
                    timeout_secs: config.timeout_secs,
                })?),
                None => {
                    warn!("EMBEDDING_URL is not set; embeddings will use fallback vectors");
                    EmbeddingBackend::Unavailable
                }
            },
            _ => {
                let base_url = config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| default_base_url(provider).to_string());
                EmbeddingBackend::Api(EmbeddingApiClient::new(ApiConfig {
                    base_url,
                    api_key: config.api_key.clone(),
                    model: model_name.to_string(),
                    timeout_secs: config.timeout_secs,
                    max_retries: 0,
                })?)
            }
        };

        Ok(Self {
            backend,
            dimensions: config.dimensions,
            cache: EmbeddingCache::new(config.cache_size),
        })
    }

    /// A provider with no endpoint. Every call yields a fallback vector.
    pub fn unavailable(dimensions: usize) -> Self {
        Self {
            backend: EmbeddingBackend::Unavailable,
            dimensions,
            cache: EmbeddingCache::disabled(),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, EmbeddingBackend::Unavailable)
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed `text`, returning a random vector of the configured dimension on
    /// any failure.
    pub async fn embed(&self, text: &str) -> Vec<f32> {
        if let Some(cached) = self.cache.get(text) {
            debug!("Embedding cache hit");
            return cached;
        }

        match self.try_embed(text).await {
            Ok(embedding) => {
                self.cache.put(text, embedding.clone());
                embedding
            }
            Err(e) => {
                warn!(error = %e, "Embedding failed, using fallback vector");
                self.fallback_vector()
            }
        }
    }

    pub async fn try_embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = match &self.backend {
            EmbeddingBackend::Proxy(client) => client.embed(text).await?,
            EmbeddingBackend::Api(client) => client
                .embed(&[text])
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| FolioError::Embedding("No embedding returned".to_string()))?,
            EmbeddingBackend::Unavailable => {
                return Err(FolioError::Embedding(
                    "No embedding service configured".to_string(),
                ))
            }
        };

        if embedding.len() != self.dimensions {
            return Err(FolioError::Embedding(format!(
                "Expected {} dimensions, got {}",
                self.dimensions,
                embedding.len()
            )));
        }
        Ok(embedding)
    }

    pub fn fallback_vector(&self) -> Vec<f32> {
        let mut rng = rand::thread_rng();
        (0..self.dimensions)
            .map(|_| rng.gen_range(-1.0f32..1.0))
            .collect()
    }
}
