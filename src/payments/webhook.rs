//! Payment provider webhook: signature verification, payload parsing, and
//! reconciliation against the donation a session id points at.
//!
//! Ordering is a correctness requirement, not a style choice: the signature
//! check runs over the exact raw bytes before anything parses them, and
//! parsing happens before any database state is touched. A forged event must
//! be rejected while it is still an opaque byte string.

use hmac::{Hmac, Mac};
use rusqlite::Connection;
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::config::PaymentConfig;
use crate::db::queries;
use crate::error::AppError;
use crate::models::{Donation, DonationStatus};

type HmacSha256 = Hmac<Sha256>;

/// Signature verification failures. Each maps to a client error at the
/// boundary; the distinction matters for operators reading logs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("Webhook secret is not configured")]
    SecretNotConfigured,

    #[error("Missing webhook signature header")]
    MissingHeader,

    #[error("Invalid webhook signature")]
    Mismatch,
}

fn compute_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verify the `X-Payment-Signature` header against the exact raw body.
///
/// Pure function of `(secret, body, header)`: hex(HMAC-SHA256(secret, body))
/// compared in constant time. Must run before the payload is parsed or any
/// state is touched.
pub fn verify_webhook_signature(
    config: &PaymentConfig,
    body: &[u8],
    header_signature: Option<&str>,
) -> Result<(), SignatureError> {
    let secret = config
        .webhook_secret
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::SecretNotConfigured)?;

    let provided = header_signature
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(SignatureError::MissingHeader)?;

    let expected = compute_signature(secret, body);

    // Length is not secret (always 64 hex chars), so the length check need
    // not be constant-time; the content comparison is.
    if expected.len() != provided.len() {
        return Err(SignatureError::Mismatch);
    }
    if bool::from(expected.as_bytes().ct_eq(provided.as_bytes())) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch)
    }
}

/// A parsed provider event. `session_id` and `status` drive reconciliation;
/// the remaining fields ride along for audit and future cross-checks.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub session_id: String,
    pub status: String,
    pub provider: Option<String>,
    pub event_type: Option<String>,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
}

/// Parse verified raw bytes into a structured event.
///
/// Anything that is not a JSON object carrying non-empty `session_id` and
/// `status` is a bad payload.
pub fn parse_webhook_event(body: &[u8]) -> crate::error::Result<WebhookEvent> {
    let event: WebhookEvent = serde_json::from_slice(body)
        .map_err(|_| AppError::BadRequest("Invalid JSON payload".into()))?;

    if event.session_id.trim().is_empty() || event.status.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Webhook payload missing required fields".into(),
        ));
    }

    Ok(event)
}

/// Map a provider-reported status string onto the donation state machine.
/// Case-insensitive; anything unrecognized falls back to `pending` rather
/// than erroring, so new provider states degrade to a no-op.
pub fn map_provider_status(provider_status: &str) -> DonationStatus {
    match provider_status.to_lowercase().as_str() {
        "success" | "succeeded" | "paid" | "completed" => DonationStatus::Confirmed,
        "failed" | "declined" => DonationStatus::Failed,
        "refunded" | "charge_refunded" => DonationStatus::Refunded,
        _ => DonationStatus::Pending,
    }
}

/// What applying an event did to the donation it references.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub donation: Donation,
    /// Donation status after this delivery
    pub status: DonationStatus,
    /// True when this call changed the stored status. Replays and degraded
    /// no-op deliveries leave it false, so side effects keyed on a real
    /// transition (the donor receipt) fire at most once.
    pub transitioned: bool,
}

/// Apply a verified, parsed event to the donation it references.
///
/// The status write is a compare-and-set keyed on the status this call
/// observed, used purely as race protection: a concurrent delivery that wins
/// the race forces a re-read and retry against fresh state. Deliveries the
/// state machine does not act on — an unrecognized provider status once the
/// donation left pending, or an out-of-order event for a settled donation —
/// degrade to a no-op that records the raw provider string and leaves the
/// settled status and money state alone.
pub fn apply_webhook_event(
    conn: &mut Connection,
    event: &WebhookEvent,
) -> crate::error::Result<ReconcileOutcome> {
    let new_status = map_provider_status(&event.status);

    for _ in 0..2 {
        let donation = queries::get_donation_by_session_id(conn, &event.session_id)?
            .ok_or_else(|| {
                AppError::NotFound("Donation matching this session_id not found".into())
            })?;

        if !donation.status.can_transition_to(new_status) {
            return record_noop(conn, &donation, &event.status);
        }

        if queries::reconcile_donation(
            conn,
            &donation.id,
            donation.status,
            new_status,
            &event.status,
        )? {
            let updated = queries::get_donation_by_id(conn, &donation.id)?.ok_or_else(|| {
                AppError::Internal("donation row missing after reconciliation".into())
            })?;
            return Ok(ReconcileOutcome {
                transitioned: donation.status != new_status,
                status: new_status,
                donation: updated,
            });
        }

        // Lost the compare-and-set; another delivery moved the row first.
        tracing::debug!(
            session_id = %event.session_id,
            "Reconciliation raced with a concurrent delivery, re-reading"
        );
    }

    // Out-raced twice. Whatever the concurrent deliveries settled on stands;
    // this one degrades to a no-op against the final state.
    let donation = queries::get_donation_by_session_id(conn, &event.session_id)?
        .ok_or_else(|| AppError::NotFound("Donation matching this session_id not found".into()))?;
    record_noop(conn, &donation, &event.status)
}

/// Persist the raw provider string without touching the mapped status.
fn record_noop(
    conn: &Connection,
    donation: &Donation,
    provider_status: &str,
) -> crate::error::Result<ReconcileOutcome> {
    queries::set_donation_provider_status(conn, &donation.id, provider_status)?;
    let refreshed = queries::get_donation_by_id(conn, &donation.id)?
        .ok_or_else(|| AppError::Internal("donation row missing after update".into()))?;
    Ok(ReconcileOutcome {
        status: donation.status,
        transitioned: false,
        donation: refreshed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(secret: Option<&str>) -> PaymentConfig {
        PaymentConfig {
            provider_name: "dummy".to_string(),
            webhook_secret: secret.map(String::from),
            public_key: None,
            secret_key: None,
        }
    }

    #[test]
    fn valid_signature_is_accepted() {
        let config = test_config(Some("testsecret"));
        let body = br#"{"session_id":"s","status":"success"}"#;
        let sig = compute_signature("testsecret", body);

        assert!(verify_webhook_signature(&config, body, Some(&sig)).is_ok());
    }

    #[test]
    fn changing_one_body_byte_fails_verification() {
        let config = test_config(Some("testsecret"));
        let body = br#"{"session_id":"s","status":"success"}"#;
        let sig = compute_signature("testsecret", body);

        let mut tampered = body.to_vec();
        tampered[10] ^= 0x01;

        assert_eq!(
            verify_webhook_signature(&config, &tampered, Some(&sig)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let config = test_config(Some("testsecret"));
        let body = b"payload";
        let sig = compute_signature("othersecret", body);

        assert_eq!(
            verify_webhook_signature(&config, body, Some(&sig)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn missing_header_and_secret_are_distinct_errors() {
        let body = b"payload";

        assert_eq!(
            verify_webhook_signature(&test_config(None), body, Some("abc")),
            Err(SignatureError::SecretNotConfigured)
        );
        assert_eq!(
            verify_webhook_signature(&test_config(Some("s")), body, None),
            Err(SignatureError::MissingHeader)
        );
        assert_eq!(
            verify_webhook_signature(&test_config(Some("s")), body, Some("  ")),
            Err(SignatureError::MissingHeader)
        );
    }

    #[test]
    fn parse_requires_session_id_and_status() {
        assert!(parse_webhook_event(b"not json").is_err());
        assert!(parse_webhook_event(br#"{"status":"success"}"#).is_err());
        assert!(parse_webhook_event(br#"{"session_id":"s"}"#).is_err());
        assert!(parse_webhook_event(br#"{"session_id":"","status":"success"}"#).is_err());

        let event =
            parse_webhook_event(br#"{"session_id":"s1","status":"paid","amount":5000}"#).unwrap();
        assert_eq!(event.session_id, "s1");
        assert_eq!(event.status, "paid");
        assert_eq!(event.amount, Some(5000));
    }

    #[test]
    fn provider_status_mapping_is_case_insensitive() {
        assert_eq!(map_provider_status("success"), DonationStatus::Confirmed);
        assert_eq!(map_provider_status("SUCCEEDED"), DonationStatus::Confirmed);
        assert_eq!(map_provider_status("Paid"), DonationStatus::Confirmed);
        assert_eq!(map_provider_status("completed"), DonationStatus::Confirmed);
        assert_eq!(map_provider_status("failed"), DonationStatus::Failed);
        assert_eq!(map_provider_status("DECLINED"), DonationStatus::Failed);
        assert_eq!(map_provider_status("refunded"), DonationStatus::Refunded);
        assert_eq!(
            map_provider_status("charge_refunded"),
            DonationStatus::Refunded
        );
        assert_eq!(map_provider_status("processing"), DonationStatus::Pending);
        assert_eq!(map_provider_status(""), DonationStatus::Pending);
    }
}
