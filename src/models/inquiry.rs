use serde::{Deserialize, Serialize};

use super::validate_email_format;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    InReview,
    Quoted,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::New => "new",
            InquiryStatus::InReview => "in_review",
            InquiryStatus::Quoted => "quoted",
            InquiryStatus::Closed => "closed",
        }
    }
}

impl std::str::FromStr for InquiryStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "new" => Ok(InquiryStatus::New),
            "in_review" => Ok(InquiryStatus::InReview),
            "quoted" => Ok(InquiryStatus::Quoted),
            "closed" => Ok(InquiryStatus::Closed),
            _ => Err(format!("invalid inquiry status: {}", s)),
        }
    }
}

/// A sales lead captured from the public contact form.
#[derive(Debug, Clone, Serialize)]
pub struct Inquiry {
    pub id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub budget_range: Option<String>,
    pub location: Option<String>,
    pub message: Option<String>,
    pub status: InquiryStatus,
    /// E.g. website, referral, social_media
    pub source: Option<String>,
    pub service_id: Option<String>,
    pub project_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateInquiry {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub budget_range: Option<String>,
    pub location: Option<String>,
    pub message: Option<String>,
    pub source: Option<String>,
    pub service_id: Option<String>,
    pub project_id: Option<String>,
}

impl CreateInquiry {
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(AppError::BadRequest("Full name cannot be empty".into()));
        }
        if let Some(ref email) = self.email {
            validate_email_format(email)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateInquiryStatus {
    pub status: InquiryStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct InquiryFilters {
    pub status: Option<InquiryStatus>,
}
