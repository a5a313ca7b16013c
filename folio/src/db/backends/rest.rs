//! Hosted Postgres reached through a PostgREST-compatible HTTP API.
//!
//! Tables: `content_entries`, `projects`, `project_images`, `tags`,
//! `project_tags`, `content_embeddings`, `project_embeddings`,
//! `user_prompts`. Similarity search goes through the
//! `match_content_entries` and `match_projects` RPC functions.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;
use url::Url;

use crate::config::BackendConfig;
use crate::db::traits::{
    ContentStore, DatabaseBackend, EmbeddingStore, ProjectStore, PromptLogStore, TagStore,
};
use crate::error::{FolioError, Result};
use crate::models::{
    serialize_vector, ContentEntry, ContentMatch, EmbeddingKind, EmbeddingRecord, Project,
    ProjectImage, ProjectMatch, Tag, UserPromptLog,
};

const PROJECT_SELECT: &str = "*,project_images(url,display_order),project_tags(tags(name))";

pub struct RestBackend {
    client: Client,
    base: Url,
    api_key: Option<String>,
}

impl RestBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let raw = config
            .url
            .as_deref()
            .ok_or_else(|| FolioError::Backend("BACKEND_URL is not set".to_string()))?;
        let base = Url::parse(&format!("{}/rest/v1/", raw.trim_end_matches('/')))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FolioError::Backend(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base.join(path)?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key).bearer_auth(key);
        }
        builder
    }

    async fn send(builder: RequestBuilder) -> Result<reqwest::Response> {
        let resp = builder.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FolioError::ApiAuth(body));
        }
        Err(FolioError::Backend(format!("{status}: {body}")))
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let resp = Self::send(builder).await?;
        resp.json::<T>()
            .await
            .map_err(|e| FolioError::Backend(format!("Malformed response: {e}")))
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let url = self.url(table, params)?;
        Self::fetch(self.request(Method::GET, url)).await
    }

    async fn insert<B: Serialize + ?Sized>(&self, table: &str, body: &B) -> Result<()> {
        let url = self.url(table, &[])?;
        Self::send(
            self.request(Method::POST, url)
                .header("Prefer", "return=minimal")
                .json(body),
        )
        .await?;
        Ok(())
    }

    /// PATCH rows matching `params`; true when at least one row changed.
    async fn patch<B: Serialize + ?Sized>(
        &self,
        table: &str,
        params: &[(&str, String)],
        body: &B,
    ) -> Result<bool> {
        let url = self.url(table, params)?;
        let rows: Vec<Value> = Self::fetch(
            self.request(Method::PATCH, url)
                .header("Prefer", "return=representation")
                .json(body),
        )
        .await?;
        Ok(!rows.is_empty())
    }

    /// DELETE rows matching `params`; true when at least one row was removed.
    async fn delete(&self, table: &str, params: &[(&str, String)]) -> Result<bool> {
        let url = self.url(table, params)?;
        let rows: Vec<Value> = Self::fetch(
            self.request(Method::DELETE, url)
                .header("Prefer", "return=representation"),
        )
        .await?;
        Ok(!rows.is_empty())
    }

    async fn rpc<T: DeserializeOwned>(&self, function: &str, body: &Value) -> Result<T> {
        let url = self.url(&format!("rpc/{function}"), &[])?;
        Self::fetch(self.request(Method::POST, url).json(body)).await
    }

    async fn replace_images(&self, project: &Project) -> Result<()> {
        self.delete("project_images", &[("project_id", eq(&project.id))]).await?;
        if project.images.is_empty() {
            return Ok(());
        }

        let rows: Vec<Value> = project
            .images
            .iter()
            .map(|image| {
                json!({
                    "project_id": project.id,
                    "url": image.url,
                    "display_order": image.display_order,
                })
            })
            .collect();
        self.insert("project_images", &rows).await
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

/// PostgREST `in` filter with every value double-quoted.
fn in_list(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

fn search_body(embedding: &[f32], threshold: f32, limit: u32) -> Value {
    json!({
        "embedding": serialize_vector(embedding),
        "threshold": threshold,
        "limit": limit,
    })
}

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TagName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ProjectTagLink {
    tags: Option<TagName>,
}

#[derive(Debug, Deserialize)]
struct ProjectRow {
    id: String,
    title: String,
    #[serde(default)]
    client: Option<String>,
    #[serde(default)]
    description: Option<String>,
    year: Option<i32>,
    #[serde(default)]
    involvement: Option<String>,
    live_url: Option<String>,
    primary_image: Option<String>,
    visible: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    project_images: Vec<ProjectImage>,
    #[serde(default)]
    project_tags: Vec<ProjectTagLink>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        let mut project = Project {
            id: row.id,
            title: row.title,
            client: row.client.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            year: row.year,
            involvement: row.involvement.unwrap_or_default(),
            live_url: row.live_url,
            tags: row
                .project_tags
                .into_iter()
                .filter_map(|link| link.tags.map(|t| t.name))
                .collect(),
            primary_image: row.primary_image,
            images: row.project_images,
            visible: row.visible,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        project.sort_images();
        project
    }
}

#[derive(Debug, Serialize)]
struct ProjectWrite<'a> {
    id: &'a str,
    title: &'a str,
    client: &'a str,
    description: &'a str,
    year: Option<i32>,
    involvement: &'a str,
    live_url: Option<&'a str>,
    primary_image: Option<&'a str>,
    visible: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Project> for ProjectWrite<'a> {
    fn from(p: &'a Project) -> Self {
        Self {
            id: &p.id,
            title: &p.title,
            client: &p.client,
            description: &p.description,
            year: p.year,
            involvement: &p.involvement,
            live_url: p.live_url.as_deref(),
            primary_image: p.primary_image.as_deref(),
            visible: p.visible,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    #[serde(alias = "content_id", alias = "project_id")]
    owner_id: String,
    content: String,
    embedding: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<EmbeddingRow> for EmbeddingRecord {
    fn from(row: EmbeddingRow) -> Self {
        // pgvector columns come back as text; plain arrays are accepted too.
        let embedding = match row.embedding {
            Value::String(text) => text,
            other => other.to_string(),
        };
        Self {
            owner_id: row.owner_id,
            content: row.content,
            embedding,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentMatchResponse {
    Wrapped { entries: Vec<ContentMatch> },
    Rows(Vec<ContentMatch>),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectMatchResponse {
    Wrapped { projects: Vec<ProjectMatch> },
    Rows(Vec<ProjectMatch>),
}

// ---------------------------------------------------------------------------
// Store implementations
// ---------------------------------------------------------------------------

#[async_trait]
impl ContentStore for RestBackend {
    async fn list_content_entries(&self, visible_only: bool) -> Result<Vec<ContentEntry>> {
        let mut params = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
        ];
        if visible_only {
            params.push(("visible", eq("true")));
        }
        self.select("content_entries", &params).await
    }

    async fn get_content_entry(&self, id: &str) -> Result<Option<ContentEntry>> {
        let rows: Vec<ContentEntry> = self
            .select("content_entries", &[("select", "*".to_string()), ("id", eq(id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn get_content_entries_by_ids(&self, ids: &[String]) -> Result<Vec<ContentEntry>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.select(
            "content_entries",
            &[("select", "*".to_string()), ("id", in_list(ids))],
        )
        .await
    }

    async fn create_content_entry(&self, entry: &ContentEntry) -> Result<()> {
        self.insert("content_entries", entry).await
    }

    async fn update_content_entry(&self, entry: &ContentEntry) -> Result<bool> {
        self.patch("content_entries", &[("id", eq(&entry.id))], entry)
            .await
    }

    async fn delete_content_entry(&self, id: &str) -> Result<bool> {
        self.delete_embedding(EmbeddingKind::Content, id).await?;
        self.delete("content_entries", &[("id", eq(id))]).await
    }

    async fn match_content_entries(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: u32,
    ) -> Result<Vec<ContentMatch>> {
        let response: ContentMatchResponse = self
            .rpc("match_content_entries", &search_body(embedding, threshold, limit))
            .await?;
        let mut matches = match response {
            ContentMatchResponse::Wrapped { entries } => entries,
            ContentMatchResponse::Rows(rows) => rows,
        };
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(limit as usize);
        debug!(count = matches.len(), "Content similarity search");
        Ok(matches)
    }
}

#[async_trait]
impl ProjectStore for RestBackend {
    async fn list_projects(&self, visible_only: bool) -> Result<Vec<Project>> {
        let mut params = vec![
            ("select", PROJECT_SELECT.to_string()),
            ("order", "year.desc.nullslast".to_string()),
        ];
        if visible_only {
            params.push(("visible", eq("true")));
        }
        let rows: Vec<ProjectRow> = self.select("projects", &params).await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let rows: Vec<ProjectRow> = self
            .select(
                "projects",
                &[("select", PROJECT_SELECT.to_string()), ("id", eq(id))],
            )
            .await?;
        Ok(rows.into_iter().next().map(Project::from))
    }

    async fn get_projects_by_ids(
        &self,
        ids: &[String],
        visible_only: bool,
    ) -> Result<Vec<Project>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut params = vec![
            ("select", PROJECT_SELECT.to_string()),
            ("id", in_list(ids)),
        ];
        if visible_only {
            params.push(("visible", eq("true")));
        }
        let rows: Vec<ProjectRow> = self.select("projects", &params).await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn create_project(&self, project: &Project) -> Result<()> {
        self.insert("projects", &ProjectWrite::from(project)).await?;
        self.replace_images(project).await
    }

    async fn update_project(&self, project: &Project) -> Result<bool> {
        let updated = self
            .patch(
                "projects",
                &[("id", eq(&project.id))],
                &ProjectWrite::from(project),
            )
            .await?;
        if updated {
            self.replace_images(project).await?;
        }
        Ok(updated)
    }

    async fn delete_project(&self, id: &str) -> Result<bool> {
        self.delete_embedding(EmbeddingKind::Project, id).await?;
        self.delete("project_images", &[("project_id", eq(id))]).await?;
        self.delete("project_tags", &[("project_id", eq(id))]).await?;
        self.delete("projects", &[("id", eq(id))]).await
    }

    async fn match_projects(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: u32,
    ) -> Result<Vec<ProjectMatch>> {
        let response: ProjectMatchResponse = self
            .rpc("match_projects", &search_body(embedding, threshold, limit))
            .await?;
        let mut matches = match response {
            ProjectMatchResponse::Wrapped { projects } => projects,
            ProjectMatchResponse::Rows(rows) => rows,
        };
        matches.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        matches.truncate(limit as usize);
        debug!(count = matches.len(), "Project similarity search");
        Ok(matches)
    }
}

#[async_trait]
impl TagStore for RestBackend {
    async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.select(
            "tags",
            &[("select", "id,name".to_string()), ("order", "name.asc".to_string())],
        )
        .await
    }

    async fn upsert_tags(&self, names: &[String]) -> Result<Vec<Tag>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        let rows: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
        let url = self.url("tags", &[("on_conflict", "name".to_string())])?;
        Self::send(
            self.request(Method::POST, url)
                .header("Prefer", "resolution=ignore-duplicates,return=minimal")
                .json(&rows),
        )
        .await?;

        self.select(
            "tags",
            &[("select", "id,name".to_string()), ("name", in_list(names))],
        )
        .await
    }

    async fn set_project_tags(&self, project_id: &str, tag_ids: &[String]) -> Result<()> {
        self.delete("project_tags", &[("project_id", eq(project_id))])
            .await?;
        if tag_ids.is_empty() {
            return Ok(());
        }

        let rows: Vec<Value> = tag_ids
            .iter()
            .map(|tag_id| json!({ "project_id": project_id, "tag_id": tag_id }))
            .collect();
        self.insert("project_tags", &rows).await
    }
}

#[async_trait]
impl EmbeddingStore for RestBackend {
    async fn upsert_embedding(
        &self,
        kind: EmbeddingKind,
        owner_id: &str,
        content: &str,
        embedding: &[f32],
    ) -> Result<()> {
        let mut row = serde_json::Map::new();
        row.insert(kind.owner_column().to_string(), json!(owner_id));
        row.insert("content".to_string(), json!(content));
        row.insert("embedding".to_string(), json!(serialize_vector(embedding)));
        row.insert("updated_at".to_string(), json!(Utc::now()));

        let url = self.url(
            kind.table(),
            &[("on_conflict", kind.owner_column().to_string())],
        )?;
        Self::send(
            self.request(Method::POST, url)
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&Value::Object(row)),
        )
        .await?;
        Ok(())
    }

    async fn get_embedding(
        &self,
        kind: EmbeddingKind,
        owner_id: &str,
    ) -> Result<Option<EmbeddingRecord>> {
        let rows: Vec<EmbeddingRow> = self
            .select(
                kind.table(),
                &[
                    ("select", "*".to_string()),
                    (kind.owner_column(), eq(owner_id)),
                ],
            )
            .await?;
        Ok(rows.into_iter().next().map(EmbeddingRecord::from))
    }

    async fn delete_embedding(&self, kind: EmbeddingKind, owner_id: &str) -> Result<bool> {
        self.delete(kind.table(), &[(kind.owner_column(), eq(owner_id))])
            .await
    }
}

#[async_trait]
impl PromptLogStore for RestBackend {
    async fn append_prompt_log(&self, log: &UserPromptLog) -> Result<()> {
        self.insert("user_prompts", log).await
    }

    async fn list_prompt_logs(&self, limit: u32) -> Result<Vec<UserPromptLog>> {
        self.select(
            "user_prompts",
            &[
                ("select", "*".to_string()),
                ("order", "created_at.desc".to_string()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }
}

#[async_trait]
impl DatabaseBackend for RestBackend {
    async fn health(&self) -> Result<()> {
        let url = self.url("projects", &[("select", "id".to_string()), ("limit", "1".to_string())])?;
        Self::send(self.request(Method::GET, url)).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rest"
    }
}
