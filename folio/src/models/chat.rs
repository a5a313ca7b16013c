use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Project;

/// Default fade-in hint for suggestion chips, in milliseconds.
pub const DEFAULT_SUGGESTION_DELAY_MS: u64 = 1000;

/// One-tap follow-up query offered after a bot reply.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub text: String,
    /// Rendering hint only.
    pub delay_ms: u64,
}

impl Suggestion {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay_ms: DEFAULT_SUGGESTION_DELAY_MS,
        }
    }
}

/// The structured answer to one chat message.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatReply {
    Gallery {
        content: String,
        projects: Vec<Project>,
    },
    Conversation {
        content: String,
        suggestions: Vec<Suggestion>,
    },
}

impl ChatReply {
    pub fn gallery(content: impl Into<String>, projects: Vec<Project>) -> Self {
        Self::Gallery {
            content: content.into(),
            projects,
        }
    }

    pub fn conversation(content: impl Into<String>) -> Self {
        Self::Conversation {
            content: content.into(),
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(self, text: impl Into<String>) -> Self {
        match self {
            Self::Conversation {
                content,
                mut suggestions,
            } => {
                suggestions.push(Suggestion::new(text));
                Self::Conversation {
                    content,
                    suggestions,
                }
            }
            gallery => gallery,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Self::Gallery { content, .. } | Self::Conversation { content, .. } => content,
        }
    }

    pub fn show_projects(&self) -> bool {
        matches!(self, Self::Gallery { .. })
    }

    pub fn projects(&self) -> &[Project] {
        match self {
            Self::Gallery { projects, .. } => projects,
            Self::Conversation { .. } => &[],
        }
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        match self {
            Self::Gallery { .. } => &[],
            Self::Conversation { suggestions, .. } => suggestions,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChatReplyWire {
    content: String,
    show_projects: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suggestions: Option<Vec<Suggestion>>,
}

impl Serialize for ChatReply {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Gallery { content, projects } => ChatReplyWire {
                content: content.clone(),
                show_projects: true,
                projects: Some(projects.clone()),
                suggestions: None,
            },
            Self::Conversation {
                content,
                suggestions,
            } => ChatReplyWire {
                content: content.clone(),
                show_projects: false,
                projects: None,
                suggestions: (!suggestions.is_empty()).then(|| suggestions.clone()),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ChatReply {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = ChatReplyWire::deserialize(deserializer)?;
        Ok(if wire.show_projects {
            Self::Gallery {
                content: wire.content,
                projects: wire.projects.unwrap_or_default(),
            }
        } else {
            Self::Conversation {
                content: wire.content,
                suggestions: wire.suggestions.unwrap_or_default(),
            }
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// A chat bubble as the widget renders it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub show_projects: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub projects: Vec<Project>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl ChatMessage {
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            id: nanoid::nanoid!(),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            show_projects: false,
            projects: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    pub fn from_reply(reply: &ChatReply) -> Self {
        Self {
            id: nanoid::nanoid!(),
            content: reply.content().to_string(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            show_projects: reply.show_projects(),
            projects: reply.projects().to_vec(),
            suggestions: reply.suggestions().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message sent to the completion service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}
