use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Client testimonial shown on the public site.
#[derive(Debug, Clone, Serialize)]
pub struct Testimonial {
    pub id: String,
    pub client_name: String,
    pub client_role: Option<String>,
    pub company: Option<String>,
    pub message: String,
    /// 1-5 star rating
    pub rating: Option<i64>,
    pub is_featured: bool,
    pub is_active: bool,
    pub display_order: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateTestimonial {
    pub client_name: String,
    pub client_role: Option<String>,
    pub company: Option<String>,
    pub message: String,
    pub rating: Option<i64>,
    #[serde(default = "default_true")]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub display_order: i64,
}

fn default_true() -> bool {
    true
}

impl CreateTestimonial {
    pub fn validate(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(AppError::BadRequest("Client name cannot be empty".into()));
        }
        if self.message.trim().is_empty() {
            return Err(AppError::BadRequest("Message cannot be empty".into()));
        }
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(AppError::BadRequest("Rating must be between 1 and 5".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTestimonial {
    pub client_name: Option<String>,
    pub client_role: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub rating: Option<i64>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
    pub display_order: Option<i64>,
}
