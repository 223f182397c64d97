use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    Ongoing,
    Completed,
    OnHold,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::Ongoing => "ongoing",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on_hold",
        }
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "planned" => Ok(ProjectStatus::Planned),
            "ongoing" => Ok(ProjectStatus::Ongoing),
            "completed" => Ok(ProjectStatus::Completed),
            "on_hold" => Ok(ProjectStatus::OnHold),
            _ => Err(format!("invalid project status: {}", s)),
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A portfolio project shown on the public site.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: String,
    /// The service this project belongs to; detached on service deletion
    pub service_id: Option<String>,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub client_name: Option<String>,
    pub status: ProjectStatus,
    pub is_featured: bool,
    pub cover_image_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub service_id: Option<String>,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub client_name: Option<String>,
    #[serde(default = "default_status")]
    pub status: ProjectStatus,
    #[serde(default)]
    pub is_featured: bool,
    pub cover_image_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn default_status() -> ProjectStatus {
    ProjectStatus::Ongoing
}

impl CreateProject {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Project name cannot be empty".into()));
        }
        if self.slug.trim().is_empty() {
            return Err(AppError::BadRequest("Project slug cannot be empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProject {
    pub service_id: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub client_name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub is_featured: Option<bool>,
    pub cover_image_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Filters for the public project listing.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilters {
    pub status: Option<ProjectStatus>,
    pub service_id: Option<String>,
    pub is_featured: Option<bool>,
}
