//! Content entry request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::V1ContentCategory;
use crate::models;

/// Request body for `POST /v1/admin/content`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentEntryRequest {
    pub title: String,
    /// Body text used verbatim as chat context.
    pub content: String,
    #[serde(rename = "type")]
    pub category: Option<V1ContentCategory>,
    /// Defaults to `true`.
    pub visible: Option<bool>,
}

/// Request body for `PATCH /v1/admin/content/{contentId}`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContentEntryRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<V1ContentCategory>,
    pub visible: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntryResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub category: V1ContentCategory,
    pub visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListContentEntriesResponse {
    pub entries: Vec<ContentEntryResponse>,
}

impl From<CreateContentEntryRequest> for models::CreateContentEntryRequest {
    fn from(req: CreateContentEntryRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            category: req.category.map(Into::into).unwrap_or_default(),
            visible: req.visible,
        }
    }
}

impl From<UpdateContentEntryRequest> for models::UpdateContentEntryRequest {
    fn from(req: UpdateContentEntryRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            category: req.category.map(Into::into),
            visible: req.visible,
        }
    }
}

impl From<models::ContentEntry> for ContentEntryResponse {
    fn from(entry: models::ContentEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            content: entry.content,
            category: entry.category.into(),
            visible: entry.visible,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}
