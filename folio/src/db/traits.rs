use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    ContentEntry, ContentMatch, EmbeddingKind, EmbeddingRecord, Project, ProjectMatch, Tag,
    UserPromptLog,
};

// ---------------------------------------------------------------------------
// Individual store traits
// ---------------------------------------------------------------------------

/// CRUD and similarity search for content entries.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn list_content_entries(&self, visible_only: bool) -> Result<Vec<ContentEntry>>;
    async fn get_content_entry(&self, id: &str) -> Result<Option<ContentEntry>>;
    /// Rows whose id is in `ids`, in no particular order.
    async fn get_content_entries_by_ids(&self, ids: &[String]) -> Result<Vec<ContentEntry>>;
    async fn create_content_entry(&self, entry: &ContentEntry) -> Result<()>;
    async fn update_content_entry(&self, entry: &ContentEntry) -> Result<bool>;
    /// Removes the entry's embedding, then the entry.
    async fn delete_content_entry(&self, id: &str) -> Result<bool>;
    /// Ranked by descending similarity, strictly above `threshold`.
    async fn match_content_entries(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: u32,
    ) -> Result<Vec<ContentMatch>>;
}

/// CRUD and similarity search for projects and their images.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_projects(&self, visible_only: bool) -> Result<Vec<Project>>;
    async fn get_project(&self, id: &str) -> Result<Option<Project>>;
    async fn get_projects_by_ids(&self, ids: &[String], visible_only: bool)
        -> Result<Vec<Project>>;
    /// Writes the project row and its images. Tags go through [`TagStore`].
    async fn create_project(&self, project: &Project) -> Result<()>;
    async fn update_project(&self, project: &Project) -> Result<bool>;
    /// Removes embedding, images, tag associations and the project, in that
    /// order.
    async fn delete_project(&self, id: &str) -> Result<bool>;
    /// Ranked by descending similarity, strictly above `threshold`.
    async fn match_projects(
        &self,
        embedding: &[f32],
        threshold: f32,
        limit: u32,
    ) -> Result<Vec<ProjectMatch>>;
}

/// Tag dictionary and project associations.
#[async_trait]
pub trait TagStore: Send + Sync {
    async fn list_tags(&self) -> Result<Vec<Tag>>;
    /// Insert missing names and return the tags for all of `names`.
    async fn upsert_tags(&self, names: &[String]) -> Result<Vec<Tag>>;
    /// Replace the project's associations with `tag_ids`.
    async fn set_project_tags(&self, project_id: &str, tag_ids: &[String]) -> Result<()>;
}

/// Derived embedding records, one per owner.
#[async_trait]
pub trait EmbeddingStore: Send + Sync {
    async fn upsert_embedding(
        &self,
        kind: EmbeddingKind,
        owner_id: &str,
        content: &str,
        embedding: &[f32],
    ) -> Result<()>;
    async fn get_embedding(
        &self,
        kind: EmbeddingKind,
        owner_id: &str,
    ) -> Result<Option<EmbeddingRecord>>;
    async fn delete_embedding(&self, kind: EmbeddingKind, owner_id: &str) -> Result<bool>;
}

/// Append-only visitor prompt log.
#[async_trait]
pub trait PromptLogStore: Send + Sync {
    async fn append_prompt_log(&self, log: &UserPromptLog) -> Result<()>;
    /// Newest first.
    async fn list_prompt_logs(&self, limit: u32) -> Result<Vec<UserPromptLog>>;
}

// ---------------------------------------------------------------------------
// Unified backend supertrait
// ---------------------------------------------------------------------------

/// A complete backend combining all store traits.
#[async_trait]
pub trait DatabaseBackend:
    ContentStore + ProjectStore + TagStore + EmbeddingStore + PromptLogStore
{
    /// Cheap reachability check used by the health endpoint.
    async fn health(&self) -> Result<()>;

    fn name(&self) -> &'static str;
}
