use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            _ => Err(format!("invalid media type: {}", s)),
        }
    }
}

/// Gallery item, optionally attached to a project. Project deletion removes
/// its media.
#[derive(Debug, Clone, Serialize)]
pub struct Media {
    pub id: String,
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub media_type: MediaType,
    pub is_featured: bool,
    pub sort_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateMedia {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
    #[serde(default = "default_media_type")]
    pub media_type: MediaType,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i64,
}

fn default_media_type() -> MediaType {
    MediaType::Image
}

impl CreateMedia {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(AppError::BadRequest("Media url cannot be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateMedia {
    pub project_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub media_type: Option<MediaType>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaFilters {
    pub project_id: Option<String>,
    pub is_featured: Option<bool>,
}
