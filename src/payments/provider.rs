//! Payment session creation for donation intents.
//!
//! The provider is a local stand-in: session ids are derived from the
//! donation id instead of coming back from a network call, so the step can
//! never fail or block. Swapping in a real card/MoMo provider keeps this
//! interface; the integration would add an outbound call with a timeout and
//! treat provider unavailability as retryable while the donation stays
//! pending.

use rusqlite::Connection;
use serde::Serialize;

use crate::config::PaymentConfig;
use crate::db::queries;
use crate::error::Result;
use crate::models::{Donation, PaymentMethod};

const CHECKOUT_BASE_URL: &str = "https://payments.example.local";

/// Result of opening a checkout session for a donation.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSession {
    pub provider: String,
    pub session_id: String,
    pub payment_url: String,
    pub payment_method: PaymentMethod,
}

/// Session ids embed provider, channel, and donation id so a session is
/// unique per donation and legible in provider dashboards and logs without a
/// lookup table.
fn session_id_for(provider: &str, method: PaymentMethod, donation_id: &str) -> String {
    format!("{}_{}_session_{}", provider, method.as_str(), donation_id)
}

fn checkout_url_for(method: PaymentMethod, session_id: &str) -> String {
    let path = match method {
        PaymentMethod::Card => format!("/card/checkout/{}", session_id),
        PaymentMethod::MtnMomo => format!("/mtn-momo/checkout/{}", session_id),
        PaymentMethod::AirtelMomo => format!("/airtel-momo/checkout/{}", session_id),
    };
    format!("{}{}", CHECKOUT_BASE_URL, path)
}

/// Open a checkout session for a freshly created pending donation.
///
/// Persists `payment_provider`, `provider_session_id`, `provider_payment_id`
/// (mirrors the session id) and `provider_status = "created"` on the donation
/// before returning, so an inbound webhook can correlate no matter how fast
/// the provider calls back.
pub fn create_payment_session(
    conn: &Connection,
    config: &PaymentConfig,
    donation: &Donation,
) -> Result<PaymentSession> {
    let method = donation.payment_method;
    let provider = config.provider_name.clone();

    let session_id = session_id_for(&provider, method, &donation.id);
    let payment_url = checkout_url_for(method, &session_id);

    queries::attach_payment_session(conn, &donation.id, &provider, &session_id, method)?;

    Ok(PaymentSession {
        provider,
        session_id,
        payment_url,
        payment_method: method,
    })
}
