use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectImage {
    pub url: String,
    pub display_order: i32,
}

/// A portfolio case study.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub client: String,
    pub description: String,
    pub year: Option<i32>,
    pub involvement: String,
    pub live_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub primary_image: Option<String>,
    /// Additional images, kept sorted by `display_order`.
    #[serde(default)]
    pub images: Vec<ProjectImage>,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(id: String, title: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            client: String::new(),
            description: String::new(),
            year: None,
            involvement: String::new(),
            live_url: None,
            tags: Vec::new(),
            primary_image: None,
            images: Vec::new(),
            visible: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Concatenation of the salient fields, used as the embedded text.
    pub fn embedding_text(&self) -> String {
        let mut parts = vec![format!("Title: {}", self.title)];
        if !self.client.is_empty() {
            parts.push(format!("Client: {}", self.client));
        }
        if let Some(year) = self.year {
            parts.push(format!("Year: {year}"));
        }
        if !self.description.is_empty() {
            parts.push(format!("Description: {}", self.description));
        }
        if !self.involvement.is_empty() {
            parts.push(format!("Involvement: {}", self.involvement));
        }
        if !self.tags.is_empty() {
            parts.push(format!("Tags: {}", self.tags.join(", ")));
        }
        parts.join("\n")
    }

    /// Lowercased title, client, description and tags for lexical matching.
    pub fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.client,
            self.description,
            self.tags.join(" ")
        )
        .to_lowercase()
    }

    /// Year used for ordering. Absent or zero sorts as the oldest.
    pub fn sort_year(&self) -> i32 {
        match self.year {
            Some(year) if year > 0 => year,
            _ => i32::MIN,
        }
    }

    pub fn sort_images(&mut self) {
        self.images.sort_by_key(|image| image.display_order);
    }
}

/// Stable sort by year descending; ties keep their incoming order.
pub fn sort_by_year_desc(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.sort_year().cmp(&a.sort_year()));
}

/// A deduplicated project label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: String,
    pub name: String,
}
