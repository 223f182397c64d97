use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// A service offering shown on the public site (e.g. irrigation systems,
/// solar installation, civil works).
#[derive(Debug, Clone, Serialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub tagline: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub hero_image_url: Option<String>,
    pub is_active: bool,
    pub display_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateService {
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub tagline: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub hero_image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i64,
}

fn default_true() -> bool {
    true
}

impl CreateService {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Service name cannot be empty".into()));
        }
        if self.slug.trim().is_empty() {
            return Err(AppError::BadRequest("Service slug cannot be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateService {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub tagline: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
    pub hero_image_url: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i64>,
}
