//! In-process backend for local development and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::traits::{
    ContentStore, DatabaseBackend, EmbeddingStore, ProjectStore, PromptLogStore, TagStore,
};
use crate::error::{FolioError, Result};
use crate::models::{
    cosine_similarity, serialize_vector, ContentEntry, ContentMatch, EmbeddingKind,
    EmbeddingRecord, Project, ProjectMatch, Tag, UserPromptLog,
};

struct StoredEmbedding {
    content: String,
    vector: Vec<f32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Default)]
struct MemoryState {
    content: Vec<ContentEntry>,
    projects: Vec<Project>,
    tags: Vec<Tag>,
    project_tags: HashMap<String, Vec<String>>,
    content_embeddings: HashMap<String, StoredEmbedding>,
    project_embeddings: HashMap<String, StoredEmbedding>,
    prompt_logs: Vec<UserPromptLog>,
}

impl MemoryState {
    fn embeddings(&self, kind: EmbeddingKind) -> &HashMap<String, StoredEmbedding> {
        match kind {
            EmbeddingKind::Content => &self.content_embeddings,
            EmbeddingKind::Project => &self.project_embeddings,
        }
    }

    fn embeddings_mut(&mut self, kind: EmbeddingKind) -> &mut HashMap<String, StoredEmbedding> {
        match kind {
            EmbeddingKind::Content => &mut self.content_embeddings,
            EmbeddingKind::Project => &mut self.project_embeddings,
        }
    }

    /// Project with its tag names resolved from the association table.
    fn hydrate(&self, project: &Project) -> Project {
        let mut project = project.clone();
        project.tags = self
            .project_tags
            .get(&project.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.tags.iter().find(|t| &t.id == id))
                    .map(|t| t.name.clone())
                    .collect()
            })
            .unwrap_or_default();
        project.sort_images();
        project
    }

    fn ranked(
        &self,
        kind: EmbeddingKind,
        query: &[f32],
        threshold: f32,
        limit: u32,
        eligible: impl Fn(&str) -> bool,
    ) -> Vec<(String, f32, String)> {
        let mut scored: Vec<(String, f32, String)> = self
            .embeddings(kind)
            .iter()
            .filter(|(owner_id, _)| eligible(owner_id.as_str()))
            .map(|(owner_id, stored)| {
                (
                    owner_id.clone(),
                    cosine_similarity(query, &stored.vector),
                    stored.content.clone(),
                )
            })
            .filter(|(_, similarity, _)| *similarity > threshold)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(limit as usize);
        scored
    }
}

/// Keeps everything in memory behind a single async lock. Similarity search
/// is a brute-force cosine scan over visible owners.
#[derive(Default)]
pub struct MemoryBackend {
    state: RwLock<MemoryState>,
    search_offline: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make both similarity searches fail, as an unreachable RPC would.
    pub fn set_search_offline(&self, offline: bool) {
        self.search_offline.store(offline, Ordering::SeqCst);
    }

    fn check_search(&self) -> Result<()> {
        if self.search_offline.load(Ordering::SeqCst) {
            return Err(FolioError::Backend(
                "similarity search unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MemoryBackend {
    async fn list_content_entries(&self, visible_only: bool) -> Result<Vec<ContentEntry>> {
        let state = self.state.read().await;
        let mut entries: Vec<ContentEntry> = state
            .content
            .iter()
            .filter(|e| !visible_only || e.visible)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    async fn get_content_entry(&self, id: &str) -> Result<Option<ContentEntry>> {
        let state = self.state.read().await;
        Ok(state.content.iter().find(|e| e.id == id).cloned())
    }

    async fn get_content_entries_by_ids(&self, ids: &[String]) -> Result<Vec<ContentEntry>> {
        let state = self.state.read().await;
        Ok(state
            .content
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }

    async fn create_content_entry(&self, entry: &ContentEntry) -> Result<()> {
        let mut state = self.state.write().await;
        if state.content.iter().any(|e| e.id == entry.id) {
            return Err(FolioError::Backend(format!(
                "Content entry {} already exists",
                entry.id
            )));
        }
        state.content.push(entry.clone());
        Ok(())
    }

    async fn update_content_entry(&self, entry: &ContentEntry) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.content.iter_mut().find(|e| e.id == entry.id) {
            Some(existing) => {
                *existing = entry.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_content_entry(&self, id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        state.content_embeddings.remove(id);
        let before = state.content.len();
        state.content.retain(|e| e.id != id);
        Ok(state.content.len() != before)
    }

    async fn match_content_entries(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: u32,
    ) -> Result<Vec<ContentMatch>> {
        self.check_search()?;
        let state = self.state.read().await;
        let visible = |id: &str| state.content.iter().any(|e| e.id == id && e.visible);

        Ok(state
            .ranked(EmbeddingKind::Content, embedding, threshold, limit, visible)
            .into_iter()
            .map(|(content_id, similarity, _)| ContentMatch {
                content_id,
                similarity,
            })
            .collect())
    }
}

#[async_trait]
impl ProjectStore for MemoryBackend {
    async fn list_projects(&self, visible_only: bool) -> Result<Vec<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .iter()
            .filter(|p| !visible_only || p.visible)
            .map(|p| state.hydrate(p))
            .collect())
    }

    async fn get_project(&self, id: &str) -> Result<Option<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| state.hydrate(p)))
    }

    async fn get_projects_by_ids(
        &self,
        ids: &[String],
        visible_only: bool,
    ) -> Result<Vec<Project>> {
        let state = self.state.read().await;
        Ok(state
            .projects
            .iter()
            .filter(|p| ids.contains(&p.id) && (!visible_only || p.visible))
            .map(|p| state.hydrate(p))
            .collect())
    }

    async fn create_project(&self, project: &Project) -> Result<()> {
        let mut state = self.state.write().await;
        if state.projects.iter().any(|p| p.id == project.id) {
            return Err(FolioError::Backend(format!(
                "Project {} already exists",
                project.id
            )));
        }
        let mut stored = project.clone();
        stored.tags.clear();
        state.projects.push(stored);
        Ok(())
    }

    async fn update_project(&self, project: &Project) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => {
                *existing = project.clone();
                existing.tags.clear();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_project(&self, id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        state.project_embeddings.remove(id);
        state.project_tags.remove(id);
        let before = state.projects.len();
        state.projects.retain(|p| p.id != id);
        Ok(state.projects.len() != before)
    }

    async fn match_projects(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: u32,
    ) -> Result<Vec<ProjectMatch>> {
        self.check_search()?;
        let state = self.state.read().await;
        let visible = |id: &str| state.projects.iter().any(|p| p.id == id && p.visible);

        Ok(state
            .ranked(EmbeddingKind::Project, embedding, threshold, limit, visible)
            .into_iter()
            .map(|(project_id, similarity, content)| ProjectMatch {
                project_id,
                similarity,
                content,
            })
            .collect())
    }
}

#[async_trait]
impl TagStore for MemoryBackend {
    async fn list_tags(&self) -> Result<Vec<Tag>> {
        let state = self.state.read().await;
        let mut tags = state.tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn upsert_tags(&self, names: &[String]) -> Result<Vec<Tag>> {
        let mut state = self.state.write().await;
        let mut result = Vec::with_capacity(names.len());
        for name in names {
            let tag = match state.tags.iter().find(|t| &t.name == name) {
                Some(tag) => tag.clone(),
                None => {
                    let tag = Tag {
                        id: Uuid::new_v4().to_string(),
                        name: name.clone(),
                    };
                    state.tags.push(tag.clone());
                    tag
                }
            };
            if !result.iter().any(|t: &Tag| t.id == tag.id) {
                result.push(tag);
            }
        }
        Ok(result)
    }

    async fn set_project_tags(&self, project_id: &str, tag_ids: &[String]) -> Result<()> {
        let mut state = self.state.write().await;
        if tag_ids.is_empty() {
            state.project_tags.remove(project_id);
        } else {
            state
                .project_tags
                .insert(project_id.to_string(), tag_ids.to_vec());
        }
        Ok(())
    }
}

#[async_trait]
impl EmbeddingStore for MemoryBackend {
    async fn upsert_embedding(
        &self,
        kind: EmbeddingKind,
        owner_id: &str,
        content: &str,
        embedding: &[f32],
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let now = Utc::now();
        let created_at = state
            .embeddings(kind)
            .get(owner_id)
            .map(|existing| existing.created_at)
            .unwrap_or(now);

        state.embeddings_mut(kind).insert(
            owner_id.to_string(),
            StoredEmbedding {
                content: content.to_string(),
                vector: embedding.to_vec(),
                created_at,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn get_embedding(
        &self,
        kind: EmbeddingKind,
        owner_id: &str,
    ) -> Result<Option<EmbeddingRecord>> {
        let state = self.state.read().await;
        Ok(state
            .embeddings(kind)
            .get(owner_id)
            .map(|stored| EmbeddingRecord {
                owner_id: owner_id.to_string(),
                content: stored.content.clone(),
                embedding: serialize_vector(&stored.vector),
                created_at: stored.created_at,
                updated_at: stored.updated_at,
            }))
    }

    async fn delete_embedding(&self, kind: EmbeddingKind, owner_id: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        Ok(state.embeddings_mut(kind).remove(owner_id).is_some())
    }
}

#[async_trait]
impl PromptLogStore for MemoryBackend {
    async fn append_prompt_log(&self, log: &UserPromptLog) -> Result<()> {
        self.state.write().await.prompt_logs.push(log.clone());
        Ok(())
    }

    async fn list_prompt_logs(&self, limit: u32) -> Result<Vec<UserPromptLog>> {
        let state = self.state.read().await;
        Ok(state
            .prompt_logs
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DatabaseBackend for MemoryBackend {
    async fn health(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
