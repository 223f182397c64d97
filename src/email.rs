//! Outgoing email for donation receipts and inquiry notifications.
//!
//! Two modes:
//! 1. Send via the Resend API when an API key is configured
//! 2. Log-only when no key is available (dev and test default)
//!
//! Every caller treats delivery as best-effort: a failed send is logged and
//! never rolled into the request that triggered it.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Donation;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Outcome of attempting to send an email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailSendResult {
    /// Delivered to the Resend API
    Sent,
    /// No recipient address was resolvable; skipped silently
    NoRecipient,
    /// No API key configured; logged instead of sent
    NoApiKey,
}

#[derive(Debug, Serialize)]
struct ResendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendEmailResponse {
    #[allow(dead_code)]
    id: String,
}

#[derive(Clone)]
pub struct EmailService {
    api_key: Option<String>,
    from_email: String,
    http_client: Client,
}

/// Format a Unix timestamp for receipt bodies (e.g. "20 Jan 2026, 10:00")
fn format_timestamp(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|| "Unknown date".to_string())
}

/// Group an integer amount with thousands separators ("120000" -> "120,000")
fn format_amount(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Compose the donation receipt subject and plain-text body.
pub fn donation_receipt(donation: &Donation, campaign_name: Option<&str>) -> (String, String) {
    let donor_name = donation
        .donor_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("Friend");
    let campaign = campaign_name.unwrap_or("General Support");

    let subject = format!("Thank you for your donation to {}", campaign);

    let body = format!(
        "Dear {},\n\n\
         Thank you for supporting Brisk Farm Solutions & Construction Company.\n\n\
         Donation details:\n\
         \x20 - Campaign: {}\n\
         \x20 - Amount: {} {}\n\
         \x20 - Status: {}\n\
         \x20 - Date: {}\n\n\
         This email serves as a simple receipt for your contribution.\n\n\
         With gratitude,\n\
         Brisk Farm Solutions & Construction Co.\n",
        donor_name,
        campaign,
        format_amount(donation.amount),
        donation.currency,
        donation.status.as_str().to_uppercase(),
        format_timestamp(donation.created_at),
    );

    (subject, body)
}

impl EmailService {
    pub fn new(api_key: Option<String>, from_email: String) -> Self {
        Self {
            api_key,
            from_email,
            http_client: Client::new(),
        }
    }

    /// Low-level send primitive.
    async fn send(&self, to: &str, subject: &str, text: &str) -> Result<EmailSendResult> {
        let Some(ref api_key) = self.api_key else {
            tracing::info!(to, subject, "No email API key configured, logging instead");
            return Ok(EmailSendResult::NoApiKey);
        };

        let request = ResendEmailRequest {
            from: &self.from_email,
            to: vec![to],
            subject,
            text,
        };

        let response = self
            .http_client
            .post(RESEND_API_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Email API error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Internal(format!(
                "Email API returned {}: {}",
                status, body
            )));
        }

        let _parsed: ResendEmailResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to parse email API response: {}", e)))?;

        Ok(EmailSendResult::Sent)
    }

    /// Send a donation receipt to the donor, if an address is known.
    pub async fn send_donation_receipt(
        &self,
        donation: &Donation,
        campaign_name: Option<&str>,
    ) -> Result<EmailSendResult> {
        let Some(recipient) = donation
            .donor_email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
        else {
            return Ok(EmailSendResult::NoRecipient);
        };

        let (subject, body) = donation_receipt(donation, campaign_name);
        self.send(recipient, &subject, &body).await
    }

    /// Notify the configured inbox about a new inquiry.
    pub async fn send_inquiry_notification(
        &self,
        to: &str,
        full_name: &str,
        message: Option<&str>,
    ) -> Result<EmailSendResult> {
        let subject = format!("New inquiry from {}", full_name);
        let body = format!(
            "A new inquiry was submitted on the website.\n\n\
             From: {}\n\
             Message: {}\n",
            full_name,
            message.unwrap_or("(none)"),
        );
        self.send(to, &subject, &body).await
    }
}
