use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
    Client,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{FolioError, Result},
    models::{ChatRole, ChatTurn},
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

pub(crate) fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_BASE_URL,
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}

fn ensure_not_empty(messages: &[ChatTurn]) -> Result<()> {
    if messages.iter().all(|m| m.content.trim().is_empty()) {
        return Err(FolioError::Validation("Prompt cannot be empty".to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Serverless completion proxy: POST {messages, model} -> {generatedText}
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ProxyRequest<'a> {
    messages: &'a [ChatTurn],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProxyResponse {
    generated_text: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct LlmProxyClient {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    model: String,
}

impl LlmProxyClient {
    pub fn new(config: &LlmConfig, url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| FolioError::Llm(format!("Failed to create LLM HTTP client: {error}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    pub async fn complete(&self, messages: &[ChatTurn]) -> Result<String> {
        ensure_not_empty(messages)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(api_key) = &self.api_key {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {api_key}"))
                    .map_err(|e| FolioError::Llm(format!("Invalid API key header: {e}")))?,
            );
        }

        let resp = self
            .client
            .post(&self.url)
            .headers(headers)
            .json(&ProxyRequest {
                messages,
                model: &self.model,
            })
            .send()
            .await
            .map_err(|e| FolioError::Llm(format!("LLM request failed: {e}")))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Err(FolioError::LlmRateLimit { retry_after });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FolioError::Llm(format!("LLM proxy error {status}: {body}")));
        }

        let body: ProxyResponse = resp
            .json()
            .await
            .map_err(|e| FolioError::Llm(format!("Failed to parse LLM response: {e}")))?;

        if let Some(error) = body.error {
            return Err(FolioError::Llm(format!("LLM proxy error: {error}")));
        }

        match body.generated_text {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(FolioError::Llm(
                "LLM response contained empty content".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI-compatible chat completions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
}

#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_config = ApiConfig::from_llm_config(config);

        let (provider, _) = parse_llm_provider_model(&config.model);
        let needs_api_key = !matches!(
            provider.to_lowercase().as_str(),
            "ollama" | "lmstudio" | "proxy"
        );

        if needs_api_key && api_config.api_key.is_none() {
            return Err(FolioError::Llm(
                "API key required for this provider".to_string(),
            ));
        }

        let openai_config = OpenAIConfig::new()
            .with_api_base(api_config.base_url.clone())
            .with_api_key(api_config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()
            .map_err(|error| {
                FolioError::Llm(format!("Failed to create LLM HTTP client: {error}"))
            })?;

        // async-openai retries 5xx internally; cap that at the call timeout.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(api_config.timeout_secs)),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: api_config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub async fn complete(&self, messages: &[ChatTurn]) -> Result<String> {
        ensure_not_empty(messages)?;

        let request = self.build_request(messages)?;

        match self.client.chat().create(request).await {
            Ok(response) => Self::extract_content(response),
            Err(error) => {
                if let Some(rate_limit_error) = Self::rate_limit_error(&error) {
                    return Err(rate_limit_error);
                }
                if let Some(auth_error) = Self::auth_error(&error) {
                    return Err(auth_error);
                }
                Err(Self::map_openai_error(error))
            }
        }
    }

    fn build_request(&self, turns: &[ChatTurn]) -> Result<CreateChatCompletionRequest> {
        let messages = turns
            .iter()
            .filter(|turn| !turn.content.trim().is_empty())
            .map(Self::to_request_message)
            .collect::<Result<Vec<_>>>()?;

        CreateChatCompletionRequestArgs::default()
            .model(self.config.model.clone())
            .messages(messages)
            .build()
            .map_err(|error| {
                FolioError::Validation(format!("Invalid LLM completion request: {error}"))
            })
    }

    fn to_request_message(turn: &ChatTurn) -> Result<ChatCompletionRequestMessage> {
        let invalid = |error: OpenAIError| FolioError::Validation(format!("Invalid message: {error}"));

        Ok(match turn.role {
            ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(turn.content.as_str())
                .build()
                .map_err(invalid)?
                .into(),
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(turn.content.as_str())
                .build()
                .map_err(invalid)?
                .into(),
            ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(turn.content.as_str())
                .build()
                .map_err(invalid)?
                .into(),
        })
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| FolioError::Llm("LLM response contained no choices".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if message.trim().is_empty() {
            return Err(FolioError::Llm(
                "LLM response contained empty content".to_string(),
            ));
        }

        Ok(message)
    }

    fn rate_limit_error(error: &OpenAIError) -> Option<FolioError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) =>
            {
                Some(FolioError::LlmRateLimit { retry_after: None })
            }
            OpenAIError::ApiError(api_error) if Self::is_rate_limit_api_error(api_error) => {
                Some(FolioError::LlmRateLimit { retry_after: None })
            }
            _ => None,
        }
    }

    fn auth_error(error: &OpenAIError) -> Option<FolioError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || reqwest_error.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                Some(FolioError::Llm(format!(
                    "LLM authentication failed: {reqwest_error}"
                )))
            }
            OpenAIError::ApiError(api_error) if Self::is_auth_api_error(api_error) => Some(
                FolioError::Llm(format!("LLM authentication failed: {api_error}")),
            ),
            _ => None,
        }
    }

    fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("rate limit")
            || message.contains("too many requests")
            || error_type.contains("rate_limit")
            || code.contains("rate_limit")
            || code == "insufficient_quota"
    }

    fn is_auth_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("unauthorized")
            || message.contains("authentication")
            || message.contains("invalid api key")
            || code.contains("invalid_api_key")
            || error_type.contains("authentication")
    }

    fn map_openai_error(error: OpenAIError) -> FolioError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => {
                FolioError::Llm(format!("LLM request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                FolioError::Llm(format!("LLM API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                FolioError::Llm(format!("Failed to parse LLM response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => FolioError::Validation(message),
            other => FolioError::Llm(other.to_string()),
        }
    }
}

impl ApiConfig {
    fn from_llm_config(config: &LlmConfig) -> Self {
        let (provider, model) = parse_llm_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: model.to_string(),
            timeout_secs: config.timeout_secs,
        }
    }
}
