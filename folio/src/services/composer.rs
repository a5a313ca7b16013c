//! Turns one visitor message into one chat reply.
//!
//! Branches are tried in a fixed order and the first that produces a reply
//! wins. Retrieval problems inside a branch are logged and the next branch
//! is tried, so `respond` always returns something the widget can render.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::RetrievalConfig;
use crate::db::DatabaseBackend;
use crate::embeddings::EmbeddingProvider;
use crate::intelligence::{extract_keywords, QueryFlags};
use crate::llm::prompts::{
    content_context, content_system_prompt, grounded_messages, projects_system_prompt,
};
use crate::llm::{LlmProvider, COMPLETION_FAILURE_MESSAGE};
use crate::models::{
    sort_by_year_desc, ChatReply, ChatTurn, ContentEntry, Project, ProjectMatches,
};
use crate::services::retrieval::{
    embed_query, filter_ai_projects, filter_projects_by_keywords, matched_keywords, with_timeout,
    ContentRetriever, ProjectRetriever,
};

pub const AI_EXPERIENCE_LEAD: &str =
    "Yes, I have worked on several AI projects. Here are some examples:";
pub const RECENT_PROJECTS_LEAD: &str =
    "Here are some of my recent projects. Click on any of them to learn more:";
pub const AI_PROJECTS_LEAD: &str =
    "Here are some of my AI-related projects. Click on any of them to learn more:";
pub const NO_PROJECTS_MESSAGE: &str =
    "I don't have any projects to show yet. Check back soon, or ask me about my experience.";
pub const RELEVANT_PROJECTS_LEAD: &str =
    "Here are some projects that might be relevant to your question:";
pub const NO_AI_PROJECTS_MESSAGE: &str =
    "I don't have AI projects to show right now, but I'd be happy to walk you through the rest of my work.";
pub const NARROW_INTEREST_MESSAGE: &str =
    "I've worked on projects across several industries and disciplines. Is there a particular area you're interested in?";
pub const DEFAULT_MESSAGE: &str =
    "I don't have specific information about that. Feel free to ask me about my work or experience.";

pub const AI_PROJECTS_SUGGESTION: &str = "Show me AI-related projects";
pub const RELATED_PROJECTS_SUGGESTION: &str = "Show me related projects";
pub const PORTFOLIO_ANYWAY_SUGGESTION: &str = "Show me your portfolio anyway";
pub const PORTFOLIO_SUGGESTION: &str = "Show me your portfolio";
pub const DEFAULT_SUGGESTION: &str = "What kind of work do you do?";

#[derive(Clone)]
pub struct ResponseComposer {
    embeddings: EmbeddingProvider,
    content: ContentRetriever,
    projects: ProjectRetriever,
    llm: LlmProvider,
    relevance_min_avg: f32,
    call_timeout: Duration,
    completion_timeout: Duration,
}

impl ResponseComposer {
    pub fn new(
        db: Arc<dyn DatabaseBackend>,
        embeddings: EmbeddingProvider,
        llm: LlmProvider,
        config: &RetrievalConfig,
    ) -> Self {
        let completion_timeout = llm
            .config()
            .map(|c| c.timeout_secs)
            .unwrap_or(config.call_timeout_secs);

        Self {
            content: ContentRetriever::new(db.clone(), embeddings.clone(), config),
            projects: ProjectRetriever::new(db, embeddings.clone(), config),
            embeddings,
            llm,
            relevance_min_avg: config.project_relevance_min_avg,
            call_timeout: Duration::from_secs(config.call_timeout_secs),
            completion_timeout: Duration::from_secs(completion_timeout),
        }
    }

    pub async fn respond(&self, message: &str) -> ChatReply {
        let flags = QueryFlags::classify(message);
        debug!(?flags, "Classified message");

        if flags.ai_experience && (flags.have_you || flags.show_projects) {
            if let Some(reply) = self.ai_gallery().await {
                info!(branch = "ai_experience", "Composed reply");
                return reply;
            }
        }

        if flags.show_projects {
            if let Some(reply) = self.show_projects(&flags).await {
                info!(branch = "show_projects", "Composed reply");
                return reply;
            }
        }

        let embedding = embed_query(&self.embeddings, message, self.call_timeout).await;
        let (entries, matches) = tokio::join!(
            self.content.find_with_embedding(&embedding),
            self.projects.find_similar_with_embedding(&embedding),
        );

        if !entries.is_empty() {
            info!(branch = "content", entries = entries.len(), "Composed reply");
            return self.answer_from_content(message, &flags, &entries).await;
        }

        if matches.is_relevant(self.relevance_min_avg) {
            if let Some(reply) = self.relevant_projects(message, &matches).await {
                info!(branch = "semantic_projects", "Composed reply");
                return reply;
            }
        } else {
            debug!(
                fallback = matches.fallback,
                average = matches.average_similarity(),
                "Semantic project results not relevant"
            );
        }

        let keywords = extract_keywords(message);
        if !keywords.is_empty() {
            if let Some(reply) = self.keyword_projects(&keywords).await {
                info!(branch = "keywords", ?keywords, "Composed reply");
                return reply;
            }
        }

        if flags.ai_experience {
            match self.projects.fetch_ai_projects().await {
                Ok(projects) if !projects.is_empty() => {
                    info!(branch = "ai_mention", "Composed reply");
                    return ai_experience_gallery(projects);
                }
                Ok(_) => {
                    info!(branch = "ai_mention", "Composed reply without projects");
                    return ChatReply::conversation(NO_AI_PROJECTS_MESSAGE)
                        .with_suggestion(PORTFOLIO_ANYWAY_SUGGESTION);
                }
                Err(e) => warn!(error = %e, "Could not fetch AI projects"),
            }
        }

        if flags.work_related {
            info!(branch = "work_mention", "Composed reply");
            return ChatReply::conversation(NARROW_INTEREST_MESSAGE)
                .with_suggestion(PORTFOLIO_SUGGESTION);
        }

        info!(branch = "default", "Composed reply");
        ChatReply::conversation(DEFAULT_MESSAGE).with_suggestion(DEFAULT_SUGGESTION)
    }

    async fn ai_gallery(&self) -> Option<ChatReply> {
        match self.projects.fetch_ai_projects().await {
            Ok(projects) if !projects.is_empty() => Some(ai_experience_gallery(projects)),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Could not fetch AI projects");
                None
            }
        }
    }

    async fn show_projects(&self, flags: &QueryFlags) -> Option<ChatReply> {
        let projects = match self.projects.fetch_projects(None).await {
            Ok(projects) => projects,
            Err(e) => {
                warn!(error = %e, "Could not fetch projects");
                return None;
            }
        };

        let ai_projects = if flags.ai {
            filter_ai_projects(&projects)
        } else {
            Vec::new()
        };

        let (mut projects, lead) = if ai_projects.is_empty() {
            (projects, RECENT_PROJECTS_LEAD)
        } else {
            (ai_projects, AI_PROJECTS_LEAD)
        };

        if projects.is_empty() {
            return Some(ChatReply::conversation(NO_PROJECTS_MESSAGE));
        }

        sort_by_year_desc(&mut projects);
        Some(ChatReply::gallery(lead, projects))
    }

    async fn answer_from_content(
        &self,
        message: &str,
        flags: &QueryFlags,
        entries: &[ContentEntry],
    ) -> ChatReply {
        let context = content_context(entries);
        let messages = grounded_messages(content_system_prompt(&context), message);
        let reply = ChatReply::conversation(self.complete(&messages).await);

        if flags.ai_experience {
            reply.with_suggestion(AI_PROJECTS_SUGGESTION)
        } else if (flags.experience || flags.experience_phrasing) && flags.work_related {
            reply.with_suggestion(RELATED_PROJECTS_SUGGESTION)
        } else {
            reply
        }
    }

    async fn relevant_projects(
        &self,
        message: &str,
        matches: &ProjectMatches,
    ) -> Option<ChatReply> {
        let ids = matches.project_ids();
        let projects = match self.projects.fetch_projects(Some(&ids)).await {
            Ok(projects) if !projects.is_empty() => projects,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "Could not fetch matched projects");
                return None;
            }
        };
        let projects = in_match_order(projects, &ids);

        let texts = matches.grounding_texts();
        let content = if texts.is_empty() {
            RELEVANT_PROJECTS_LEAD.to_string()
        } else {
            let messages = grounded_messages(projects_system_prompt(&texts), message);
            match with_timeout(self.completion_timeout, self.llm.try_complete(&messages)).await {
                Ok(text) => text,
                Err(e) => {
                    warn!(error = %e, "Project answer failed, using generic lead");
                    RELEVANT_PROJECTS_LEAD.to_string()
                }
            }
        };

        Some(ChatReply::gallery(content, projects))
    }

    async fn keyword_projects(&self, keywords: &BTreeSet<String>) -> Option<ChatReply> {
        let all = match self.projects.fetch_projects(None).await {
            Ok(projects) => projects,
            Err(e) => {
                warn!(error = %e, "Could not fetch projects for keyword match");
                return None;
            }
        };

        let mut projects = filter_projects_by_keywords(&all, keywords);
        if projects.is_empty() {
            return None;
        }

        let hits = matched_keywords(&projects, keywords);
        sort_by_year_desc(&mut projects);
        let content = format!(
            "Here are some projects related to {}. Click on any of them to learn more:",
            join_naturally(&hits)
        );
        Some(ChatReply::gallery(content, projects))
    }

    async fn complete(&self, messages: &[ChatTurn]) -> String {
        match tokio::time::timeout(self.completion_timeout, self.llm.complete(messages)).await {
            Ok(text) => text,
            Err(_) => {
                warn!(
                    timeout_secs = self.completion_timeout.as_secs(),
                    "Completion timed out"
                );
                COMPLETION_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

fn ai_experience_gallery(mut projects: Vec<Project>) -> ChatReply {
    sort_by_year_desc(&mut projects);
    ChatReply::gallery(AI_EXPERIENCE_LEAD, projects)
}

/// Reorder fetched projects to follow the search ranking.
fn in_match_order(projects: Vec<Project>, ids: &[String]) -> Vec<Project> {
    let mut by_id: HashMap<String, Project> =
        projects.into_iter().map(|p| (p.id.clone(), p)).collect();
    let mut ordered: Vec<Project> = ids.iter().filter_map(|id| by_id.remove(id)).collect();
    sort_by_year_desc(&mut ordered);
    ordered
}

/// "a", "a and b", "a, b and c".
fn join_naturally(words: &[String]) -> String {
    match words {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
