use std::sync::Arc;

use chrono::Utc;
use nanoid::nanoid;
use tracing::{info, warn};
use validator::Validate;

use crate::db::DatabaseBackend;
use crate::embeddings::EmbeddingProvider;
use crate::error::{FolioError, Result};
use crate::models::{
    normalize_tag_names, sort_by_year_desc, ContentEntry, CreateContentEntryRequest,
    CreateProjectRequest, EmbeddingKind, Project, ReembedSummary, Tag, UpdateContentEntryRequest,
    UpdateProjectRequest,
};

/// Admin write path for content entries, projects and tags.
///
/// Every save regenerates the owner's embedding afterwards. That step is
/// best-effort and never rolls back the save.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<dyn DatabaseBackend>,
    embeddings: EmbeddingProvider,
}

impl CatalogService {
    pub fn new(db: Arc<dyn DatabaseBackend>, embeddings: EmbeddingProvider) -> Self {
        Self { db, embeddings }
    }

    pub async fn list_content_entries(&self) -> Result<Vec<ContentEntry>> {
        let mut entries = self.db.list_content_entries(false).await?;
        entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(entries)
    }

    pub async fn get_content_entry(&self, id: &str) -> Result<ContentEntry> {
        self.db
            .get_content_entry(id)
            .await?
            .ok_or_else(|| FolioError::NotFound(format!("Content entry {id} not found")))
    }

    pub async fn create_content_entry(
        &self,
        req: CreateContentEntryRequest,
    ) -> Result<ContentEntry> {
        req.validate()?;

        let mut entry = ContentEntry::new(nanoid!(), req.title, req.content, req.category);
        if let Some(visible) = req.visible {
            entry.visible = visible;
        }

        self.db.create_content_entry(&entry).await?;
        info!(id = %entry.id, category = %entry.category, "Created content entry");

        self.refresh_content_embedding(&entry).await;
        Ok(entry)
    }

    pub async fn update_content_entry(
        &self,
        id: &str,
        req: UpdateContentEntryRequest,
    ) -> Result<ContentEntry> {
        req.validate()?;

        let mut entry = self.get_content_entry(id).await?;
        if let Some(title) = req.title {
            entry.title = title;
        }
        if let Some(content) = req.content {
            entry.content = content;
        }
        if let Some(category) = req.category {
            entry.category = category;
        }
        if let Some(visible) = req.visible {
            entry.visible = visible;
        }
        entry.updated_at = Utc::now();

        if !self.db.update_content_entry(&entry).await? {
            return Err(FolioError::NotFound(format!("Content entry {id} not found")));
        }
        info!(id = %entry.id, "Updated content entry");

        self.refresh_content_embedding(&entry).await;
        Ok(entry)
    }

    pub async fn delete_content_entry(&self, id: &str) -> Result<()> {
        if !self.db.delete_content_entry(id).await? {
            return Err(FolioError::NotFound(format!("Content entry {id} not found")));
        }
        info!(id, "Deleted content entry");
        Ok(())
    }

    /// Projects ordered by year descending.
    pub async fn list_projects(&self, visible_only: bool) -> Result<Vec<Project>> {
        let mut projects = self.db.list_projects(visible_only).await?;
        sort_by_year_desc(&mut projects);
        Ok(projects)
    }

    pub async fn get_project(&self, id: &str, visible_only: bool) -> Result<Project> {
        self.db
            .get_project(id)
            .await?
            .filter(|p| p.visible || !visible_only)
            .ok_or_else(|| FolioError::NotFound(format!("Project {id} not found")))
    }

    pub async fn create_project(&self, req: CreateProjectRequest) -> Result<Project> {
        req.validate()?;

        let mut project = Project::new(nanoid!(), req.title);
        project.client = req.client.unwrap_or_default();
        project.description = req.description.unwrap_or_default();
        project.year = req.year;
        project.involvement = req.involvement.unwrap_or_default();
        project.live_url = req.live_url;
        project.primary_image = req.primary_image;
        project.images = req.images;
        project.sort_images();
        if let Some(visible) = req.visible {
            project.visible = visible;
        }

        self.db.create_project(&project).await?;
        project.tags = self.apply_tags(&project.id, &req.tags).await?;
        info!(id = %project.id, tags = project.tags.len(), "Created project");

        self.refresh_project_embedding(&project).await;
        Ok(project)
    }

    pub async fn update_project(&self, id: &str, req: UpdateProjectRequest) -> Result<Project> {
        req.validate()?;

        let mut project = self.get_project(id, false).await?;
        if let Some(title) = req.title {
            project.title = title;
        }
        if let Some(client) = req.client {
            project.client = client;
        }
        if let Some(description) = req.description {
            project.description = description;
        }
        if let Some(year) = req.year {
            project.year = Some(year);
        }
        if let Some(involvement) = req.involvement {
            project.involvement = involvement;
        }
        if let Some(live_url) = req.live_url {
            project.live_url = Some(live_url).filter(|url| !url.is_empty());
        }
        if let Some(primary_image) = req.primary_image {
            project.primary_image = Some(primary_image).filter(|url| !url.is_empty());
        }
        if let Some(images) = req.images {
            project.images = images;
            project.sort_images();
        }
        if let Some(visible) = req.visible {
            project.visible = visible;
        }
        project.updated_at = Utc::now();

        if !self.db.update_project(&project).await? {
            return Err(FolioError::NotFound(format!("Project {id} not found")));
        }

        let tags = req.tags.unwrap_or_else(|| project.tags.clone());
        project.tags = self.apply_tags(&project.id, &tags).await?;
        info!(id = %project.id, "Updated project");

        self.refresh_project_embedding(&project).await;
        Ok(project)
    }

    pub async fn delete_project(&self, id: &str) -> Result<()> {
        if !self.db.delete_project(id).await? {
            return Err(FolioError::NotFound(format!("Project {id} not found")));
        }
        info!(id, "Deleted project");
        Ok(())
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.db.list_tags().await
    }

    /// Regenerate the embedding of every content entry and project.
    pub async fn reembed_all(&self) -> Result<ReembedSummary> {
        let mut summary = ReembedSummary::default();

        for entry in self.db.list_content_entries(false).await? {
            if self.refresh_content_embedding(&entry).await {
                summary.content_entries += 1;
            } else {
                summary.failed += 1;
            }
        }

        for project in self.db.list_projects(false).await? {
            if self.refresh_project_embedding(&project).await {
                summary.projects += 1;
            } else {
                summary.failed += 1;
            }
        }

        info!(
            content_entries = summary.content_entries,
            projects = summary.projects,
            failed = summary.failed,
            "Re-embedded catalog"
        );
        Ok(summary)
    }

    /// Create unseen tags and replace the project's associations. Returns the
    /// stored tag names in request order.
    async fn apply_tags(&self, project_id: &str, names: &[String]) -> Result<Vec<String>> {
        let names = normalize_tag_names(names);
        if names.is_empty() {
            self.db.set_project_tags(project_id, &[]).await?;
            return Ok(Vec::new());
        }

        let tags = self.db.upsert_tags(&names).await?;
        let tag_ids: Vec<String> = tags.iter().map(|t| t.id.clone()).collect();
        self.db.set_project_tags(project_id, &tag_ids).await?;

        Ok(tags.into_iter().map(|t| t.name).collect())
    }

    async fn refresh_content_embedding(&self, entry: &ContentEntry) -> bool {
        self.refresh_embedding(EmbeddingKind::Content, &entry.id, &entry.embedding_text())
            .await
    }

    async fn refresh_project_embedding(&self, project: &Project) -> bool {
        self.refresh_embedding(EmbeddingKind::Project, &project.id, &project.embedding_text())
            .await
    }

    async fn refresh_embedding(&self, kind: EmbeddingKind, owner_id: &str, text: &str) -> bool {
        let embedding = match self.embeddings.try_embed(text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(owner_id, table = kind.table(), error = %e, "Skipping embedding refresh");
                return false;
            }
        };

        match self
            .db
            .upsert_embedding(kind, owner_id, text, &embedding)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(owner_id, table = kind.table(), error = %e, "Failed to store embedding");
                false
            }
        }
    }
}
