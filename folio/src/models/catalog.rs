use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{ContentCategory, ProjectImage};

fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    for tag in tags {
        let len = tag.trim().chars().count();
        if len == 0 || len > 50 {
            let mut err = ValidationError::new("tag_length");
            err.message = Some("tag names must be 1 to 50 characters".into());
            return Err(err);
        }
    }
    Ok(())
}

fn validate_images(images: &Vec<ProjectImage>) -> Result<(), ValidationError> {
    if images.iter().any(|image| image.url.trim().is_empty()) {
        let mut err = ValidationError::new("image_url");
        err.message = Some("image urls cannot be empty".into());
        return Err(err);
    }
    Ok(())
}

/// An empty string is allowed so that updates can clear the link.
fn validate_url_or_empty(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || url::Url::parse(value).is_ok() {
        return Ok(());
    }
    let mut err = ValidationError::new("url");
    err.message = Some("must be a valid URL".into());
    Err(err)
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateContentEntryRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 20_000))]
    pub content: String,
    #[serde(default, rename = "type")]
    pub category: ContentCategory,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateContentEntryRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1, max = 20_000))]
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<ContentCategory>,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 200))]
    pub client: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    pub involvement: Option<String>,
    #[validate(url)]
    pub live_url: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_tags"))]
    pub tags: Vec<String>,
    pub primary_image: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_images"))]
    pub images: Vec<ProjectImage>,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 200))]
    pub client: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    pub involvement: Option<String>,
    #[validate(custom(function = "validate_url_or_empty"))]
    pub live_url: Option<String>,
    #[validate(custom(function = "validate_tags"))]
    pub tags: Option<Vec<String>>,
    pub primary_image: Option<String>,
    #[validate(custom(function = "validate_images"))]
    pub images: Option<Vec<ProjectImage>>,
    pub visible: Option<bool>,
}

/// Outcome of regenerating every stored embedding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReembedSummary {
    pub content_entries: usize,
    pub projects: usize,
    pub failed: usize,
}

/// Trim, drop empties and deduplicate case-insensitively, keeping first
/// spelling and order.
pub fn normalize_tag_names(tags: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .map(str::to_string)
        .collect()
}
