//! Admin DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models;

/// Response for `POST /v1/admin/embeddings:rebuild`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReembedResponse {
    /// Content entries whose embedding was rewritten.
    pub content_entries: usize,
    /// Projects whose embedding was rewritten.
    pub projects: usize,
    /// Records left without a fresh embedding.
    pub failed: usize,
}

/// Query parameters for `GET /v1/admin/prompts`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPromptsQuery {
    /// Max entries to return (default 100, max 500).
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PromptLogResponse {
    pub id: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListPromptLogsResponse {
    pub prompts: Vec<PromptLogResponse>,
}

impl From<models::ReembedSummary> for ReembedResponse {
    fn from(summary: models::ReembedSummary) -> Self {
        Self {
            content_entries: summary.content_entries,
            projects: summary.projects,
            failed: summary.failed,
        }
    }
}

impl From<models::UserPromptLog> for PromptLogResponse {
    fn from(log: models::UserPromptLog) -> Self {
        Self {
            id: log.id,
            content: log.content,
            response: log.response,
            session_id: log.session_id,
            created_at: log.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reembed_response_serializes_camel_case() {
        let resp = ReembedResponse::from(models::ReembedSummary {
            content_entries: 3,
            projects: 2,
            failed: 1,
        });
        let json = serde_json::to_value(&resp).expect("serialize");
        assert_eq!(json["contentEntries"], 3);
        assert_eq!(json["projects"], 2);
        assert_eq!(json["failed"], 1);
    }

    #[test]
    fn prompt_without_response_omits_field() {
        let log = models::UserPromptLog::new(
            &models::SessionContext::new(),
            "hello".to_string(),
            None,
        );
        let json = serde_json::to_value(PromptLogResponse::from(log)).expect("serialize");
        assert!(json.get("response").is_none());
        assert!(json.get("sessionId").is_some());
    }
}
