use serde::{Deserialize, Serialize};

use super::validate_email_format;
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DonationStatus {
    Pending,
    Confirmed,
    Failed,
    Refunded,
}

impl DonationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DonationStatus::Pending => "pending",
            DonationStatus::Confirmed => "confirmed",
            DonationStatus::Failed => "failed",
            DonationStatus::Refunded => "refunded",
        }
    }

    /// The donation state machine. Identity transitions are always legal so
    /// a replayed webhook delivery stays a no-op; the only way out of
    /// `confirmed` is an explicit refund from the provider.
    pub fn can_transition_to(&self, next: DonationStatus) -> bool {
        if *self == next {
            return true;
        }
        match self {
            DonationStatus::Pending => true,
            DonationStatus::Confirmed => next == DonationStatus::Refunded,
            DonationStatus::Failed | DonationStatus::Refunded => false,
        }
    }
}

impl std::str::FromStr for DonationStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "pending" => Ok(DonationStatus::Pending),
            "confirmed" => Ok(DonationStatus::Confirmed),
            "failed" => Ok(DonationStatus::Failed),
            "refunded" => Ok(DonationStatus::Refunded),
            _ => Err(format!("invalid donation status: {}", s)),
        }
    }
}

impl std::fmt::Display for DonationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    MtnMomo,
    AirtelMomo,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::MtnMomo => "mtn_momo",
            PaymentMethod::AirtelMomo => "airtel_momo",
        }
    }

    /// Normalize a client-supplied method string. Unknown or missing values
    /// become `card` rather than an error - the checkout page can still
    /// collect the real channel.
    pub fn normalize(raw: Option<&str>) -> PaymentMethod {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("mtn_momo") => PaymentMethod::MtnMomo,
            Some("airtel_momo") => PaymentMethod::AirtelMomo,
            _ => PaymentMethod::Card,
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "mtn_momo" => Ok(PaymentMethod::MtnMomo),
            "airtel_momo" => Ok(PaymentMethod::AirtelMomo),
            _ => Err(format!("invalid payment method: {}", s)),
        }
    }
}

/// A donor contribution, optionally tied to a campaign.
///
/// `provider_session_id` is the correlation key matching webhook events back
/// to this row. Card fields are fingerprint-only; a full PAN is never stored.
#[derive(Debug, Clone, Serialize)]
pub struct Donation {
    pub id: String,
    /// Integer major currency units (e.g. UGX)
    pub amount: i64,
    pub currency: String,
    pub status: DonationStatus,

    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub is_anonymous: bool,
    pub message: Option<String>,

    /// None = general fund
    pub campaign_id: Option<String>,

    pub payment_method: PaymentMethod,
    pub payment_provider: Option<String>,
    pub provider_session_id: Option<String>,
    pub provider_payment_id: Option<String>,
    pub provider_customer_id: Option<String>,
    /// Raw provider-reported status string, unmapped
    pub provider_status: Option<String>,

    pub card_brand: Option<String>,
    pub card_last4: Option<String>,
    pub card_exp_month: Option<i64>,
    pub card_exp_year: Option<i64>,

    pub ip_address: Option<String>,
    pub user_agent: Option<String>,

    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateDonation {
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    pub message: Option<String>,
    pub campaign_id: Option<String>,
    /// Raw string: unknown values are normalized to "card", never rejected
    pub payment_method: Option<String>,
}

fn default_currency() -> String {
    "UGX".to_string()
}

impl CreateDonation {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= 0 {
            return Err(AppError::BadRequest(
                "Donation amount must be greater than zero".into(),
            ));
        }
        if self.currency.len() != 3 {
            return Err(AppError::BadRequest(
                "Currency must be a 3-letter code".into(),
            ));
        }
        if let Some(ref email) = self.donor_email {
            validate_email_format(email)?;
        }
        Ok(())
    }
}

/// Donor-facing projection: safe for a thank-you page. No provider
/// identifiers, card fingerprint, or request metadata.
#[derive(Debug, Clone, Serialize)]
pub struct DonationPublic {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: DonationStatus,
    pub donor_name: Option<String>,
    pub donor_email: Option<String>,
    pub donor_phone: Option<String>,
    pub is_anonymous: bool,
    pub message: Option<String>,
    pub campaign_id: Option<String>,
    pub payment_method: PaymentMethod,
    pub created_at: i64,
}

impl From<&Donation> for DonationPublic {
    fn from(d: &Donation) -> Self {
        Self {
            id: d.id.clone(),
            amount: d.amount,
            currency: d.currency.clone(),
            status: d.status,
            donor_name: d.donor_name.clone(),
            donor_email: d.donor_email.clone(),
            donor_phone: d.donor_phone.clone(),
            is_anonymous: d.is_anonymous,
            message: d.message.clone(),
            campaign_id: d.campaign_id.clone(),
            payment_method: d.payment_method,
            created_at: d.created_at,
        }
    }
}

/// Response for POST /donations: the public projection plus everything the
/// frontend needs to hand the donor to the provider checkout.
#[derive(Debug, Serialize)]
pub struct DonationIntentResponse {
    pub donation: DonationPublic,
    pub payment_url: Option<String>,
    pub provider_session_id: Option<String>,
}

/// Admin list filters, parsed at the router boundary (dates arrive as
/// ISO-8601 strings and land here as Unix timestamps).
#[derive(Debug, Default)]
pub struct DonationFilters {
    pub campaign_id: Option<String>,
    pub status: Option<DonationStatus>,
    pub date_from: Option<i64>,
    pub date_to: Option<i64>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
}
