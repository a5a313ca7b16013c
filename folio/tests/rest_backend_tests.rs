use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use folio::config::BackendConfig;
use folio::db::{ContentStore, DatabaseBackend, ProjectStore, RestBackend, TagStore};
use folio::error::FolioError;

mod common;
use common::init_test_logger;

fn backend(server: &MockServer) -> RestBackend {
    RestBackend::new(&BackendConfig {
        url: Some(server.uri()),
        api_key: Some("service-key".to_string()),
        timeout_secs: 5,
    })
    .expect("backend")
}

fn project_row(id: &str, year: i32) -> serde_json::Value {
    json!({
        "id": id,
        "title": format!("Project {id}"),
        "client": null,
        "description": "A project",
        "year": year,
        "involvement": null,
        "live_url": null,
        "primary_image": null,
        "visible": true,
        "created_at": "2024-01-01T00:00:00Z",
        "updated_at": "2024-01-01T00:00:00Z",
        "project_images": [
            { "url": "https://cdn.example.com/b.png", "display_order": 2 },
            { "url": "https://cdn.example.com/a.png", "display_order": 1 }
        ],
        "project_tags": [
            { "tags": { "name": "Mobile" } },
            { "tags": null }
        ]
    })
}

#[tokio::test]
async fn visible_projects_are_filtered_server_side() {
    init_test_logger();
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/projects"))
        .and(query_param("visible", "eq.true"))
        .and(header("apikey", "service-key"))
        .and(header("authorization", "Bearer service-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([project_row("p1", 2024)])))
        .expect(1)
        .mount(&server)
        .await;

    let projects = backend(&server).list_projects(true).await.unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].tags, vec!["Mobile".to_string()]);
    assert_eq!(projects[0].images[0].url, "https://cdn.example.com/a.png");
    assert_eq!(projects[0].client, "");
}

#[tokio::test]
async fn project_matches_are_ranked_and_truncated() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/match_projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "project_id": "low", "similarity": 0.71, "content": "Title: Low" },
            { "project_id": "high", "similarity": 0.95, "content": "Title: High" },
            { "project_id": "mid", "similarity": 0.8, "content": "Title: Mid" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let matches = backend(&server)
        .match_projects(&[0.1, 0.2, 0.3], 0.7, 2)
        .await
        .unwrap();

    let ids: Vec<&str> = matches.iter().map(|m| m.project_id.as_str()).collect();
    assert_eq!(ids, vec!["high", "mid"]);
}

#[tokio::test]
async fn content_matches_accept_wrapped_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/match_content_entries"))
        .and(body_json(json!({
            "embedding": "[1,0]",
            "threshold": 0.5,
            "limit": 5
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{ "content_id": "c1", "similarity": 0.9 }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let matches = backend(&server)
        .match_content_entries(&[1.0, 0.0], 0.5, 5)
        .await
        .unwrap();

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].content_id, "c1");
}

#[tokio::test]
async fn upserting_tags_reselects_existing_rows() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/tags"))
        .and(query_param("on_conflict", "name"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "t1", "name": "AI" },
            { "id": "t2", "name": "Mobile" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tags = backend(&server)
        .upsert_tags(&["AI".to_string(), "Mobile".to_string()])
        .await
        .unwrap();

    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["AI", "Mobile"]);
}

#[tokio::test]
async fn deleting_a_project_clears_dependents_first() {
    let server = MockServer::start().await;

    for table in ["project_embeddings", "project_images", "project_tags"] {
        Mock::given(method("DELETE"))
            .and(path(format!("/rest/v1/{table}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
    }
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/projects"))
        .and(query_param("id", "eq.p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": "p1" }])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(backend(&server).delete_project("p1").await.unwrap());
}

#[tokio::test]
async fn rejected_credentials_surface_as_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/projects"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let err = backend(&server).health().await.unwrap_err();
    assert!(matches!(err, FolioError::ApiAuth(_)), "got {err:?}");
}

#[tokio::test]
async fn server_errors_surface_as_backend_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/content_entries"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let err = backend(&server)
        .list_content_entries(false)
        .await
        .unwrap_err();
    assert!(matches!(err, FolioError::Backend(_)), "got {err:?}");
    assert_eq!(backend(&server).name(), "rest");
}
