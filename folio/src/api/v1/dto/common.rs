//! Shared DTO types used across multiple v1 API endpoints.

use serde::{Deserialize, Serialize};

use crate::models::ContentCategory;

/// Content entry category for v1 API.
///
/// Wire format: lowercase string (`"skill"`, `"background"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum V1ContentCategory {
    Skill,
    Background,
    Thought,
    Experience,
    Education,
    Other,
}

impl From<ContentCategory> for V1ContentCategory {
    fn from(category: ContentCategory) -> Self {
        match category {
            ContentCategory::Skill => V1ContentCategory::Skill,
            ContentCategory::Background => V1ContentCategory::Background,
            ContentCategory::Thought => V1ContentCategory::Thought,
            ContentCategory::Experience => V1ContentCategory::Experience,
            ContentCategory::Education => V1ContentCategory::Education,
            ContentCategory::Other => V1ContentCategory::Other,
        }
    }
}

impl From<V1ContentCategory> for ContentCategory {
    fn from(category: V1ContentCategory) -> Self {
        match category {
            V1ContentCategory::Skill => ContentCategory::Skill,
            V1ContentCategory::Background => ContentCategory::Background,
            V1ContentCategory::Thought => ContentCategory::Thought,
            V1ContentCategory::Experience => ContentCategory::Experience,
            V1ContentCategory::Education => ContentCategory::Education,
            V1ContentCategory::Other => ContentCategory::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_wire_format_matches_model() {
        for category in [
            ContentCategory::Skill,
            ContentCategory::Background,
            ContentCategory::Thought,
            ContentCategory::Experience,
            ContentCategory::Education,
            ContentCategory::Other,
        ] {
            let v1 = V1ContentCategory::from(category);
            assert_eq!(
                serde_json::to_value(v1).unwrap(),
                serde_json::to_value(category).unwrap()
            );
            assert_eq!(ContentCategory::from(v1), category);
        }
    }
}
