use std::collections::{BTreeSet, HashMap};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::RetrievalConfig;
use crate::db::DatabaseBackend;
use crate::embeddings::EmbeddingProvider;
use crate::error::{FolioError, Result};
use crate::models::{ContentEntry, Project, ProjectMatches};

const AI_MARKERS: &[&str] = &["ai", "artificial intelligence"];

/// Run `fut` with a deadline. Expiry is reported as [`FolioError::Timeout`].
pub(crate) async fn with_timeout<T, F>(limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(FolioError::Timeout(limit.as_secs())),
    }
}

/// Embed a visitor message. Never fails: a slow or broken embedding service
/// yields the provider's fallback vector.
pub(crate) async fn embed_query(
    embeddings: &EmbeddingProvider,
    message: &str,
    limit: Duration,
) -> Vec<f32> {
    match tokio::time::timeout(limit, embeddings.embed(message)).await {
        Ok(embedding) => embedding,
        Err(_) => {
            warn!(timeout_secs = limit.as_secs(), "Query embedding timed out");
            embeddings.fallback_vector()
        }
    }
}

/// Semantic search over curated content entries.
#[derive(Clone)]
pub struct ContentRetriever {
    db: Arc<dyn DatabaseBackend>,
    embeddings: EmbeddingProvider,
    threshold: f32,
    limit: u32,
    call_timeout: Duration,
}

impl ContentRetriever {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        embeddings: EmbeddingProvider,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            db,
            embeddings,
            threshold: config.content_threshold,
            limit: config.content_limit,
            call_timeout: Duration::from_secs(config.call_timeout_secs),
        }
    }

    /// Visible entries relevant to `message`, most similar first. Empty on
    /// any failure.
    pub async fn find_relevant_content_entries(&self, message: &str) -> Vec<ContentEntry> {
        let embedding = embed_query(&self.embeddings, message, self.call_timeout).await;
        self.find_with_embedding(&embedding).await
    }

    pub async fn find_with_embedding(&self, embedding: &[f32]) -> Vec<ContentEntry> {
        match self.try_find(embedding).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "Content retrieval failed");
                Vec::new()
            }
        }
    }

    async fn try_find(&self, embedding: &[f32]) -> Result<Vec<ContentEntry>> {
        let matches = with_timeout(
            self.call_timeout,
            self.db
                .match_content_entries(embedding, self.threshold, self.limit),
        )
        .await?;

        if matches.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = matches.iter().map(|m| m.content_id.clone()).collect();
        let rows =
            with_timeout(self.call_timeout, self.db.get_content_entries_by_ids(&ids)).await?;

        let mut by_id: HashMap<String, ContentEntry> = rows
            .into_iter()
            .filter(|entry| entry.visible)
            .map(|entry| (entry.id.clone(), entry))
            .collect();

        let entries: Vec<ContentEntry> = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        debug!(
            matched = matches.len(),
            visible = entries.len(),
            "Content retrieval complete"
        );
        Ok(entries)
    }
}

/// Semantic and lexical lookups over projects.
#[derive(Clone)]
pub struct ProjectRetriever {
    db: Arc<dyn DatabaseBackend>,
    embeddings: EmbeddingProvider,
    threshold: f32,
    limit: u32,
    call_timeout: Duration,
}

impl ProjectRetriever {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        embeddings: EmbeddingProvider,
        config: &RetrievalConfig,
    ) -> Self {
        Self {
            db,
            embeddings,
            threshold: config.project_threshold,
            limit: config.project_limit,
            call_timeout: Duration::from_secs(config.call_timeout_secs),
        }
    }

    pub async fn find_similar_projects(&self, message: &str) -> ProjectMatches {
        let embedding = embed_query(&self.embeddings, message, self.call_timeout).await;
        self.find_similar_with_embedding(&embedding).await
    }

    /// Ranked matches above the project threshold.
    ///
    /// If the search call fails, every visible project comes back with zero
    /// similarity and `fallback = true`.
    pub async fn find_similar_with_embedding(&self, embedding: &[f32]) -> ProjectMatches {
        let search = with_timeout(
            self.call_timeout,
            self.db.match_projects(embedding, self.threshold, self.limit),
        )
        .await;

        match search {
            Ok(matches) => {
                debug!(matched = matches.len(), "Project search complete");
                ProjectMatches::found(matches)
            }
            Err(e) => {
                warn!(error = %e, "Project search failed, returning fallback results");
                let ids = match self.fetch_projects(None).await {
                    Ok(projects) => projects.into_iter().map(|p| p.id).collect(),
                    Err(e) => {
                        warn!(error = %e, "Could not list projects for fallback results");
                        Vec::new()
                    }
                };
                ProjectMatches::fallback(ids)
            }
        }
    }

    /// All visible projects, or the visible subset whose id is in `ids`.
    /// No particular order.
    pub async fn fetch_projects(&self, ids: Option<&[String]>) -> Result<Vec<Project>> {
        let mut projects = match ids {
            None => with_timeout(self.call_timeout, self.db.list_projects(true)).await?,
            Some([]) => return Ok(Vec::new()),
            Some(ids) => {
                with_timeout(self.call_timeout, self.db.get_projects_by_ids(ids, true)).await?
            }
        };
        projects.retain(|p| p.visible);
        Ok(projects)
    }

    pub async fn fetch_ai_projects(&self) -> Result<Vec<Project>> {
        let projects = self.fetch_projects(None).await?;
        Ok(filter_ai_projects(&projects))
    }
}

/// Projects whose title, client, description or tags mention any keyword.
pub fn filter_projects_by_keywords(
    projects: &[Project],
    keywords: &BTreeSet<String>,
) -> Vec<Project> {
    if keywords.is_empty() {
        return Vec::new();
    }

    projects
        .iter()
        .filter(|project| {
            let text = project.searchable_text();
            keywords
                .iter()
                .any(|keyword| text.contains(&keyword.to_lowercase()))
        })
        .cloned()
        .collect()
}

/// Keywords that occur in at least one of `projects`, alphabetically.
pub fn matched_keywords(projects: &[Project], keywords: &BTreeSet<String>) -> Vec<String> {
    let texts: Vec<String> = projects.iter().map(Project::searchable_text).collect();
    keywords
        .iter()
        .filter(|keyword| {
            let keyword = keyword.to_lowercase();
            texts.iter().any(|text| text.contains(&keyword))
        })
        .cloned()
        .collect()
}

/// Projects whose title, description or any tag mentions AI.
///
/// Same substring rule as the query classifier, so "email" in a description
/// counts.
pub fn filter_ai_projects(projects: &[Project]) -> Vec<Project> {
    projects
        .iter()
        .filter(|project| is_ai_project(project))
        .cloned()
        .collect()
}

fn is_ai_project(project: &Project) -> bool {
    let mentions_ai = |text: &str| {
        let lower = text.to_lowercase();
        AI_MARKERS.iter().any(|marker| lower.contains(marker))
    };

    mentions_ai(&project.title)
        || mentions_ai(&project.description)
        || project.tags.iter().any(|tag| mentions_ai(tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ContentStore, EmbeddingStore, MemoryBackend, ProjectStore};
    use crate::models::{ContentCategory, EmbeddingKind};

    fn project(id: &str, title: &str, description: &str, tags: &[&str]) -> Project {
        let mut project = Project::new(id.to_string(), title.to_string());
        project.description = description.to_string();
        project.tags = tags.iter().map(|t| t.to_string()).collect();
        project
    }

    fn keywords(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn retrieval_config() -> RetrievalConfig {
        RetrievalConfig {
            call_timeout_secs: 2,
            ..RetrievalConfig::default()
        }
    }

    #[test]
    fn keyword_filter_matches_any_field_case_insensitively() {
        let mut clinic = project("p1", "Clinic Portal", "Booking for patients", &[]);
        clinic.client = "Acme HEALTHCARE".to_string();
        let shop = project("p2", "Storefront", "Online retail", &["Mobile"]);
        let blog = project("p3", "Blog", "Writing", &[]);
        let projects = vec![clinic, shop, blog];

        let found = filter_projects_by_keywords(&projects, &keywords(&["healthcare", "mobile"]));
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["p1", "p2"]);
    }

    #[test]
    fn keyword_filter_with_no_keywords_is_empty() {
        let projects = vec![project("p1", "Anything", "", &[])];
        assert!(filter_projects_by_keywords(&projects, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn matched_keywords_only_reports_hits() {
        let projects = vec![project("p1", "Fitness tracker", "", &["mobile"])];
        let hits = matched_keywords(&projects, &keywords(&["fitness", "mobile", "banking"]));
        assert_eq!(hits, vec!["fitness", "mobile"]);
    }

    #[test]
    fn ai_filter_checks_title_description_and_tags() {
        let projects = vec![
            project("p1", "AI Assistant", "", &[]),
            project("p2", "Support bot", "Built on artificial intelligence", &[]),
            project("p3", "Shop", "Checkout flow", &["AI"]),
            project("p4", "Banking", "Ledger", &["fintech"]),
        ];

        let ids: Vec<String> = filter_ai_projects(&projects)
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn content_retrieval_keeps_ranking_and_drops_hidden() {
        let db = Arc::new(MemoryBackend::new());
        let near = ContentEntry::new(
            "near".into(),
            "Rust".into(),
            "Daily driver".into(),
            ContentCategory::Skill,
        );
        let mut hidden = ContentEntry::new(
            "hidden".into(),
            "Secret".into(),
            "Draft".into(),
            ContentCategory::Thought,
        );
        hidden.visible = false;
        let far = ContentEntry::new(
            "far".into(),
            "Design".into(),
            "Sometimes".into(),
            ContentCategory::Skill,
        );

        for (entry, vector) in [
            (&near, vec![1.0, 0.0, 0.0]),
            (&hidden, vec![1.0, 0.0, 0.0]),
            (&far, vec![0.6, 0.8, 0.0]),
        ] {
            db.create_content_entry(entry).await.unwrap();
            db.upsert_embedding(EmbeddingKind::Content, &entry.id, "", &vector)
                .await
                .unwrap();
        }

        let retriever =
            ContentRetriever::new(db, EmbeddingProvider::unavailable(3), &retrieval_config());
        let entries = retriever.find_with_embedding(&[1.0, 0.0, 0.0]).await;
        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(ids, vec!["near", "far"]);
    }

    #[tokio::test]
    async fn content_retrieval_failure_is_empty() {
        let db = Arc::new(MemoryBackend::new());
        db.set_search_offline(true);

        let retriever =
            ContentRetriever::new(db, EmbeddingProvider::unavailable(3), &retrieval_config());
        assert!(retriever.find_with_embedding(&[1.0, 0.0, 0.0]).await.is_empty());
    }

    #[tokio::test]
    async fn project_search_failure_returns_zero_similarity_fallback() {
        let db = Arc::new(MemoryBackend::new());
        let visible = Project::new("p1".into(), "Visible".into());
        let mut hidden = Project::new("p2".into(), "Hidden".into());
        hidden.visible = false;
        db.create_project(&visible).await.unwrap();
        db.create_project(&hidden).await.unwrap();
        db.set_search_offline(true);

        let retriever =
            ProjectRetriever::new(db, EmbeddingProvider::unavailable(3), &retrieval_config());
        let matches = retriever.find_similar_with_embedding(&[1.0, 0.0, 0.0]).await;

        assert!(matches.fallback);
        assert_eq!(matches.project_ids(), vec!["p1".to_string()]);
        assert!(matches.matches.iter().all(|m| m.similarity == 0.0));
        assert!(!matches.is_relevant(0.3));
    }

    #[tokio::test]
    async fn message_lookups_survive_offline_search() {
        let db = Arc::new(MemoryBackend::new());
        db.create_project(&Project::new("p1".into(), "Visible".into()))
            .await
            .unwrap();
        db.set_search_offline(true);

        let config = retrieval_config();
        let content =
            ContentRetriever::new(db.clone(), EmbeddingProvider::unavailable(3), &config);
        let projects = ProjectRetriever::new(db, EmbeddingProvider::unavailable(3), &config);

        assert!(content.find_relevant_content_entries("rust").await.is_empty());
        let matches = projects.find_similar_projects("rust").await;
        assert!(matches.fallback);
        assert_eq!(matches.project_ids(), vec!["p1".to_string()]);
    }

    #[tokio::test]
    async fn fetch_projects_by_ids_hides_invisible() {
        let db = Arc::new(MemoryBackend::new());
        let visible = Project::new("p1".into(), "Visible".into());
        let mut hidden = Project::new("p2".into(), "Hidden".into());
        hidden.visible = false;
        db.create_project(&visible).await.unwrap();
        db.create_project(&hidden).await.unwrap();

        let retriever =
            ProjectRetriever::new(db, EmbeddingProvider::unavailable(3), &retrieval_config());
        let ids = vec!["p1".to_string(), "p2".to_string()];
        let projects = retriever.fetch_projects(Some(&ids)).await.unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, "p1");
        assert!(retriever.fetch_projects(Some(&[])).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn with_timeout_reports_expiry() {
        let result: Result<()> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;

        assert!(matches!(result, Err(FolioError::Timeout(_))));
    }
}
