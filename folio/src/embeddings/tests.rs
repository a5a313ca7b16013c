//! Tests for the embedding clients and the never-failing provider.

use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::EmbeddingsConfig;
use crate::embeddings::api::{ApiConfig, EmbeddingApiClient, EmbeddingProxyClient, ProxyConfig};
use crate::embeddings::EmbeddingProvider;
use crate::error::FolioError;

fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        api_key: Some("test-api-key".to_string()),
        model: "text-embedding-3-small".to_string(),
        timeout_secs: 10,
        max_retries: 2,
    }
}

fn proxy_provider_config(url: String, dimensions: usize) -> EmbeddingsConfig {
    EmbeddingsConfig {
        model: "proxy".to_string(),
        url: Some(url),
        api_key: None,
        base_url: None,
        dimensions,
        timeout_secs: 5,
        cache_size: 16,
    }
}

fn embedding_response(embeddings: Vec<Vec<f32>>) -> serde_json::Value {
    json!({
        "data": embeddings.into_iter().map(|e| json!({ "embedding": e })).collect::<Vec<_>>()
    })
}

// =============================================================================
// Proxy function contract
// =============================================================================

#[tokio::test]
async fn test_proxy_client_sends_text_and_reads_embedding() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/functions/v1/embed"))
        .and(body_json(json!({ "text": "hello world" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "embedding": [0.1, 0.2, 0.3] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = EmbeddingProxyClient::new(ProxyConfig {
        url: format!("{}/functions/v1/embed", mock_server.uri()),
        api_key: None,
        timeout_secs: 5,
    })
    .unwrap();

    let embedding = client.embed("hello world").await.unwrap();
    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
}

#[tokio::test]
async fn test_proxy_client_malformed_payload_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vector": "nope" })))
        .mount(&mock_server)
        .await;

    let client = EmbeddingProxyClient::new(ProxyConfig {
        url: mock_server.uri(),
        api_key: Some("anon-key".to_string()),
        timeout_secs: 5,
    })
    .unwrap();

    let err = client.embed("hello").await.unwrap_err();
    assert!(matches!(err, FolioError::Embedding(_)));
}

// =============================================================================
// OpenAI-compatible client
// =============================================================================

#[tokio::test]
async fn test_api_client_request_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .and(header("authorization", "Bearer test-api-key"))
        .and(body_json(json!({
            "model": "text-embedding-3-small",
            "input": ["hello world"]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(embedding_response(vec![vec![0.1, 0.2, 0.3]])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = EmbeddingApiClient::new(api_config(&mock_server.uri())).unwrap();

    let embeddings = client.embed(&["hello world"]).await.unwrap();
    assert_eq!(embeddings, vec![vec![0.1, 0.2, 0.3]]);
}

#[tokio::test]
async fn test_api_client_server_error_retry() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with({
            let count = Arc::clone(&attempt_count);
            move |_: &wiremock::Request| {
                let attempt = count.fetch_add(1, Ordering::SeqCst);
                if attempt < 1 {
                    ResponseTemplate::new(500).set_body_json(json!({ "error": "boom" }))
                } else {
                    ResponseTemplate::new(200)
                        .set_body_json(embedding_response(vec![vec![0.1, 0.2, 0.3]]))
                }
            }
        })
        .mount(&mock_server)
        .await;

    let client = EmbeddingApiClient::new(api_config(&mock_server.uri())).unwrap();

    assert!(client.embed(&["test"]).await.is_ok());
    assert_eq!(attempt_count.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_api_client_auth_error_no_retry() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));

    Mock::given(method("POST"))
        .and(path("/embeddings"))
        .respond_with({
            let count = Arc::clone(&attempt_count);
            move |_: &wiremock::Request| {
                count.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(401).set_body_string("invalid key")
            }
        })
        .mount(&mock_server)
        .await;

    let client = EmbeddingApiClient::new(api_config(&mock_server.uri())).unwrap();

    let err = client.embed(&["test"]).await.unwrap_err();
    assert!(matches!(err, FolioError::ApiAuth(_)));
    assert_eq!(attempt_count.load(Ordering::SeqCst), 1);
}

// =============================================================================
// Provider fallback behavior
// =============================================================================

#[tokio::test]
async fn test_provider_returns_fallback_vector_on_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let provider =
        EmbeddingProvider::new(&proxy_provider_config(mock_server.uri(), 1536)).unwrap();

    let embedding = provider.embed("what do you do?").await;
    assert_eq!(embedding.len(), 1536);
    assert!(provider.try_embed("what do you do?").await.is_err());
}

#[tokio::test]
async fn test_provider_rejects_wrong_dimension() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "embedding": [0.1, 0.2] })))
        .mount(&mock_server)
        .await;

    let provider = EmbeddingProvider::new(&proxy_provider_config(mock_server.uri(), 3)).unwrap();

    assert!(provider.try_embed("x").await.is_err());
    assert_eq!(provider.embed("x").await.len(), 3);
}

#[tokio::test]
async fn test_provider_caches_successful_embeddings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "embedding": [0.5, 0.5, 0.5] })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = EmbeddingProvider::new(&proxy_provider_config(mock_server.uri(), 3)).unwrap();

    let first = provider.embed("Show me recent work").await;
    let second = provider.embed("show me recent work").await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_provider_never_caches_fallback_vectors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let provider = EmbeddingProvider::new(&proxy_provider_config(mock_server.uri(), 8)).unwrap();

    provider.embed("hello").await;
    provider.embed("hello").await;
}

#[tokio::test]
async fn test_unavailable_provider_uses_fallback() {
    let provider = EmbeddingProvider::unavailable(1536);
    assert!(!provider.is_available());
    assert_eq!(provider.embed("anything").await.len(), 1536);
    assert!(provider.try_embed("anything").await.is_err());
}

#[test]
fn test_proxy_model_without_url_is_unavailable() {
    let config = EmbeddingsConfig::default();
    let provider = EmbeddingProvider::new(&config).unwrap();
    assert!(!provider.is_available());
    assert_eq!(provider.dimensions(), 1536);
}
