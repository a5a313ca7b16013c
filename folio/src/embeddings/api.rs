use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{FolioError, Result};

/// Provider-specific default base URLs
pub fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => "https://api.openai.com/v1",
        "openrouter" => "https://openrouter.ai/api/v1",
        "ollama" => "http://localhost:11434/v1",
        "lmstudio" => "http://localhost:1234/v1",
        _ => "https://api.openai.com/v1",
    }
}

fn json_headers(api_key: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(api_key) = api_key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| FolioError::Embedding(format!("Invalid API key header: {e}")))?,
        );
    }
    Ok(headers)
}

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| FolioError::Embedding(format!("Failed to create HTTP client: {e}")))
}

async fn error_for_status(resp: reqwest::Response) -> FolioError {
    let status = resp.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return FolioError::Embedding(format!("Rate limited ({status})"));
    }

    let body = resp.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return FolioError::ApiAuth(body);
    }
    FolioError::Embedding(format!("API error {status}: {body}"))
}

// ---------------------------------------------------------------------------
// Serverless proxy function: POST {text} -> {embedding}
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize)]
struct ProxyRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ProxyResponse {
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct EmbeddingProxyClient {
    client: Client,
    config: ProxyConfig,
}

impl EmbeddingProxyClient {
    pub fn new(config: ProxyConfig) -> Result<Self> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let headers = json_headers(self.config.api_key.as_deref())?;

        let resp = self
            .client
            .post(&self.config.url)
            .headers(headers)
            .json(&ProxyRequest { text })
            .send()
            .await
            .map_err(|e| FolioError::Embedding(format!("Request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(error_for_status(resp).await);
        }

        let body: ProxyResponse = resp
            .json()
            .await
            .map_err(|e| FolioError::Embedding(format!("Failed to parse response: {e}")))?;
        Ok(body.embedding)
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible `/embeddings` endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Clone)]
pub struct EmbeddingApiClient {
    client: Client,
    config: ApiConfig,
}

impl EmbeddingApiClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = build_client(config.timeout_secs)?;
        Ok(Self { client, config })
    }

    pub async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: texts.to_vec(),
        };
        let headers = json_headers(self.config.api_key.as_deref())?;
        let url = format!("{}/embeddings", self.config.base_url.trim_end_matches('/'));

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2_u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .headers(headers.clone())
                .json(&request)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_success() {
                        let body: EmbeddingResponse = resp.json().await.map_err(|e| {
                            FolioError::Embedding(format!("Failed to parse response: {e}"))
                        })?;
                        return Ok(body.data.into_iter().map(|d| d.embedding).collect());
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
                    {
                        last_error = Some(error_for_status(resp).await);
                        continue;
                    }

                    return Err(error_for_status(resp).await);
                }
                Err(e) => {
                    last_error = Some(FolioError::Embedding(format!("Request failed: {e}")));
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FolioError::Embedding("Unknown error".to_string())))
    }
}
