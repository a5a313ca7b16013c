use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Skill,
    Background,
    Thought,
    Experience,
    Education,
    #[default]
    Other,
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skill => write!(f, "skill"),
            Self::Background => write!(f, "background"),
            Self::Thought => write!(f, "thought"),
            Self::Experience => write!(f, "experience"),
            Self::Education => write!(f, "education"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for ContentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skill" => Ok(Self::Skill),
            "background" => Ok(Self::Background),
            "thought" => Ok(Self::Thought),
            "experience" => Ok(Self::Experience),
            "education" => Ok(Self::Education),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown content category: {s}")),
        }
    }
}

/// A curated knowledge snippet about the site owner.
///
/// Only entries with `visible = true` are eligible for retrieval or display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub category: ContentCategory,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentEntry {
    pub fn new(id: String, title: String, content: String, category: ContentCategory) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            content,
            category,
            visible: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Text stored alongside the entry's embedding.
    pub fn embedding_text(&self) -> String {
        format!("{}: {}", self.title, self.content)
    }

    /// One line of LLM context: `[type] title: content`.
    pub fn context_line(&self) -> String {
        format!("[{}] {}: {}", self.category, self.title, self.content)
    }
}
