//! Project request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectImageDto {
    pub url: String,
    #[serde(default)]
    pub display_order: i32,
}

/// Request body for `POST /v1/admin/projects`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: String,
    pub client: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    /// Free-text narrative of the owner's role.
    pub involvement: Option<String>,
    pub live_url: Option<String>,
    /// Tag names. Unseen names are created.
    #[serde(default)]
    pub tags: Vec<String>,
    pub primary_image: Option<String>,
    #[serde(default)]
    pub images: Vec<ProjectImageDto>,
    /// Defaults to `true`.
    pub visible: Option<bool>,
}

/// Request body for `PATCH /v1/admin/projects/{projectId}`. Absent fields
/// are left unchanged; an empty `liveUrl` or `primaryImage` clears it.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub client: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub involvement: Option<String>,
    pub live_url: Option<String>,
    /// Replaces all tag associations when present.
    pub tags: Option<Vec<String>>,
    pub primary_image: Option<String>,
    pub images: Option<Vec<ProjectImageDto>>,
    pub visible: Option<bool>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub client: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub involvement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_image: Option<String>,
    pub images: Vec<ProjectImageDto>,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsResponse {
    pub projects: Vec<ProjectResponse>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListTagsResponse {
    pub tags: Vec<TagResponse>,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<ProjectImageDto> for models::ProjectImage {
    fn from(image: ProjectImageDto) -> Self {
        Self {
            url: image.url,
            display_order: image.display_order,
        }
    }
}

impl From<models::ProjectImage> for ProjectImageDto {
    fn from(image: models::ProjectImage) -> Self {
        Self {
            url: image.url,
            display_order: image.display_order,
        }
    }
}

impl From<CreateProjectRequest> for models::CreateProjectRequest {
    fn from(req: CreateProjectRequest) -> Self {
        Self {
            title: req.title,
            client: req.client,
            description: req.description,
            year: req.year,
            involvement: req.involvement,
            live_url: req.live_url.filter(|url| !url.trim().is_empty()),
            tags: req.tags,
            primary_image: req.primary_image,
            images: req.images.into_iter().map(Into::into).collect(),
            visible: req.visible,
        }
    }
}

impl From<UpdateProjectRequest> for models::UpdateProjectRequest {
    fn from(req: UpdateProjectRequest) -> Self {
        Self {
            title: req.title,
            client: req.client,
            description: req.description,
            year: req.year,
            involvement: req.involvement,
            live_url: req.live_url,
            tags: req.tags,
            primary_image: req.primary_image,
            images: req
                .images
                .map(|images| images.into_iter().map(Into::into).collect()),
            visible: req.visible,
        }
    }
}

impl From<models::Project> for ProjectResponse {
    fn from(project: models::Project) -> Self {
        Self {
            id: project.id,
            title: project.title,
            client: project.client,
            description: project.description,
            year: project.year,
            involvement: project.involvement,
            live_url: project.live_url,
            tags: project.tags,
            primary_image: project.primary_image,
            images: project.images.into_iter().map(Into::into).collect(),
            visible: project.visible,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

impl From<models::Tag> for TagResponse {
    fn from(tag: models::Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}
