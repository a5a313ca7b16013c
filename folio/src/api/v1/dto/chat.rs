//! Chat widget DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::projects::ProjectResponse;
use crate::models;

/// Request body for `POST /v1/chat`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The visitor's free-text message.
    pub message: String,
    /// Session id persisted by the widget. A new one is issued when absent
    /// or not a UUID.
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub text: String,
    /// Fade-in hint for the widget, in milliseconds.
    pub delay: u64,
}

/// The composed reply. `projects` is present only when `showProjects` is
/// true; `suggestions` only on conversational replies that offer chips.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatReplyResponse {
    pub content: String,
    pub show_projects: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<ProjectResponse>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<SuggestionResponse>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum V1Sender {
    User,
    Bot,
}

/// The reply as a ready-to-render chat bubble.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessageResponse {
    pub id: String,
    pub content: String,
    pub sender: V1Sender,
    pub timestamp: DateTime<Utc>,
    pub show_projects: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<ProjectResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<SuggestionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: ChatReplyResponse,
    pub message: ChatMessageResponse,
    pub session_id: Uuid,
}

impl From<models::Suggestion> for SuggestionResponse {
    fn from(suggestion: models::Suggestion) -> Self {
        Self {
            text: suggestion.text,
            delay: suggestion.delay_ms,
        }
    }
}

impl From<models::ChatReply> for ChatReplyResponse {
    fn from(reply: models::ChatReply) -> Self {
        match reply {
            models::ChatReply::Gallery { content, projects } => Self {
                content,
                show_projects: true,
                projects: Some(projects.into_iter().map(Into::into).collect()),
                suggestions: None,
            },
            models::ChatReply::Conversation {
                content,
                suggestions,
            } => Self {
                content,
                show_projects: false,
                projects: None,
                suggestions: if suggestions.is_empty() {
                    None
                } else {
                    Some(suggestions.into_iter().map(Into::into).collect())
                },
            },
        }
    }
}

impl From<models::Sender> for V1Sender {
    fn from(sender: models::Sender) -> Self {
        match sender {
            models::Sender::User => V1Sender::User,
            models::Sender::Bot => V1Sender::Bot,
        }
    }
}

impl From<models::ChatMessage> for ChatMessageResponse {
    fn from(message: models::ChatMessage) -> Self {
        Self {
            id: message.id,
            content: message.content,
            sender: message.sender.into(),
            timestamp: message.timestamp,
            show_projects: message.show_projects,
            projects: message.projects.into_iter().map(Into::into).collect(),
            suggestions: message.suggestions.into_iter().map(Into::into).collect(),
        }
    }
}
