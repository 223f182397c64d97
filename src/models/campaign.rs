use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Closed,
    Archived,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Closed => "closed",
            CampaignStatus::Archived => "archived",
        }
    }

    /// Draft campaigns accept donations too, so early gifts can land before
    /// the public launch.
    pub fn accepts_donations(&self) -> bool {
        matches!(self, CampaignStatus::Active | CampaignStatus::Draft)
    }
}

impl std::str::FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(CampaignStatus::Draft),
            "active" => Ok(CampaignStatus::Active),
            "closed" => Ok(CampaignStatus::Closed),
            "archived" => Ok(CampaignStatus::Archived),
            _ => Err(format!("invalid campaign status: {}", s)),
        }
    }
}

impl std::fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fundraising campaign. Amounts are integer major currency units.
///
/// `raised_amount` is maintained by the webhook reconciler: confirmations add
/// the donation amount, refunds of confirmed donations subtract it.
#[derive(Debug, Clone, Serialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub currency: String,
    pub target_amount: Option<i64>,
    pub raised_amount: i64,
    pub status: CampaignStatus,
    pub is_featured: bool,
    pub sort_order: i64,
    pub hero_image_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaign {
    pub name: String,
    pub slug: String,
    pub short_description: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub target_amount: Option<i64>,
    #[serde(default = "default_status")]
    pub status: CampaignStatus,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub sort_order: i64,
    pub hero_image_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn default_currency() -> String {
    "UGX".to_string()
}

fn default_status() -> CampaignStatus {
    CampaignStatus::Active
}

impl CreateCampaign {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Campaign name cannot be empty".into()));
        }
        if self.slug.trim().is_empty() {
            return Err(AppError::BadRequest("Campaign slug cannot be empty".into()));
        }
        if self.currency.len() != 3 {
            return Err(AppError::BadRequest(
                "Currency must be a 3-letter code".into(),
            ));
        }
        if let Some(target) = self.target_amount {
            if target <= 0 {
                return Err(AppError::BadRequest(
                    "Target amount must be greater than zero".into(),
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCampaign {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub currency: Option<String>,
    pub target_amount: Option<i64>,
    pub status: Option<CampaignStatus>,
    pub is_featured: Option<bool>,
    pub sort_order: Option<i64>,
    pub hero_image_url: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CampaignFilters {
    pub status: Option<CampaignStatus>,
    pub is_featured: Option<bool>,
}
