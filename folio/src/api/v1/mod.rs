pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::Config;
    use crate::db::MemoryBackend;
    use crate::embeddings::EmbeddingProvider;
    use crate::llm::LlmProvider;
    use crate::services::composer::DEFAULT_MESSAGE;

    fn test_app(api_keys: Vec<String>) -> Router {
        let mut config = Config::default();
        config.server.api_keys = api_keys;

        let state = AppState::new(
            config,
            Arc::new(MemoryBackend::new()),
            EmbeddingProvider::unavailable(3),
            LlmProvider::unavailable("not configured in tests"),
        );
        create_router(state)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn admin_route_requires_auth() {
        let app = test_app(vec!["test-key".to_string()]);

        let response = app.oneshot(get("/api/v1/admin/projects")).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unauthorized");
    }

    #[tokio::test]
    async fn admin_route_accepts_valid_key() {
        let app = test_app(vec!["test-key".to_string()]);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/admin/tags")
                    .header("Authorization", "Bearer test-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["tags"], serde_json::json!([]));
        assert_eq!(json["meta"]["total"], 0);
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = test_app(vec!["secret".to_string()]);

        let response = app.oneshot(get("/api/v1/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["backend"]["kind"], "memory");
        assert_eq!(json["data"]["embeddings"]["status"], "degraded");
        assert_eq!(json["data"]["llm"]["status"], "unavailable");
    }

    #[tokio::test]
    async fn openapi_json_is_public_and_valid() {
        let app = test_app(vec!["secret".to_string()]);

        let response = app.oneshot(get("/api/v1/openapi.json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let version = json["openapi"]
            .as_str()
            .expect("openapi field should be a string");
        assert!(
            version.starts_with("3"),
            "OpenAPI version should start with 3, got: {version}"
        );
        assert!(json["paths"].get("/api/v1/chat").is_some());
    }

    #[tokio::test]
    async fn success_envelope_has_data_no_error() {
        let app = test_app(vec!["k".to_string()]);

        let response = app.oneshot(get("/api/v1/projects")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json.get("data").is_some(), "success should have 'data' key");
        assert!(
            json.get("error").is_none(),
            "success should NOT have 'error' key"
        );
    }

    #[tokio::test]
    async fn error_envelope_has_error_no_data() {
        let app = test_app(vec!["key".to_string()]);

        let response = app
            .oneshot(post_json("/api/v1/admin/embeddings:rebuild", "{}"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert!(json.get("data").is_none());
        assert!(json["error"]["code"].is_string());
        assert!(json["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn unknown_route_uses_envelope() {
        let app = test_app(vec![]);

        let response = app.oneshot(get("/nope")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn chat_falls_back_to_default_reply() {
        let app = test_app(vec![]);

        let response = app
            .oneshot(post_json(
                "/api/v1/chat",
                r#"{"message": "what's the weather today"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let reply = &json["data"]["reply"];
        assert_eq!(reply["content"], DEFAULT_MESSAGE);
        assert_eq!(reply["showProjects"], false);
        assert_eq!(reply["suggestions"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"]["message"]["sender"], "bot");
        assert!(json["data"]["sessionId"].is_string());
    }

    #[tokio::test]
    async fn chat_reuses_client_session_id() {
        let app = test_app(vec![]);
        let session_id = uuid::Uuid::new_v4().to_string();

        let response = app
            .oneshot(post_json(
                "/api/v1/chat",
                &format!(r#"{{"message": "hello", "sessionId": "{session_id}"}}"#),
            ))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["data"]["sessionId"], session_id);
    }

    #[tokio::test]
    async fn chat_rejects_blank_message() {
        let app = test_app(vec![]);

        let response = app
            .oneshot(post_json("/api/v1/chat", r#"{"message": "   "}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn chat_names_missing_field() {
        let app = test_app(vec![]);

        let response = app
            .oneshot(post_json("/api/v1/chat", r#"{"sessionId": "x"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Missing required field: message");
    }

    #[tokio::test]
    async fn chat_prompts_are_logged() {
        let app = test_app(vec![]);

        app.clone()
            .oneshot(post_json("/api/v1/chat", r#"{"message": "hello there"}"#))
            .await
            .unwrap();

        let response = app.oneshot(get("/api/v1/admin/prompts")).await.unwrap();
        let json = body_json(response).await;
        let prompts = json["data"]["prompts"].as_array().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0]["content"], "hello there");
        assert!(prompts[0]["response"].is_string());
    }

    #[tokio::test]
    async fn hidden_projects_stay_out_of_the_gallery() {
        let app = test_app(vec![]);

        let created = app
            .clone()
            .oneshot(post_json(
                "/api/v1/admin/projects",
                r#"{"title": "Secret", "year": 2024, "visible": false, "tags": ["Health"]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["tags"], serde_json::json!(["Health"]));

        let list = body_json(app.clone().oneshot(get("/api/v1/projects")).await.unwrap()).await;
        assert_eq!(list["data"]["projects"], serde_json::json!([]));

        let public = app
            .clone()
            .oneshot(get(&format!("/api/v1/projects/{id}")))
            .await
            .unwrap();
        assert_eq!(public.status(), StatusCode::NOT_FOUND);

        let admin = app
            .oneshot(get(&format!("/api/v1/admin/projects/{id}")))
            .await
            .unwrap();
        assert_eq!(admin.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_project_is_rejected() {
        let app = test_app(vec![]);

        let response = app
            .oneshot(post_json(
                "/api/v1/admin/projects",
                r#"{"title": "Bad year", "year": 1200}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn content_entry_crud_round_trip() {
        let app = test_app(vec![]);

        let created = app
            .clone()
            .oneshot(post_json(
                "/api/v1/admin/content",
                r#"{"title": "Rust", "content": "I write Rust daily.", "type": "skill"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let created = body_json(created).await;
        let id = created["data"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["data"]["type"], "skill");

        let deleted = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/api/v1/admin/content/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.status(), StatusCode::OK);

        let missing = app
            .oneshot(get(&format!("/api/v1/admin/content/{id}")))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
