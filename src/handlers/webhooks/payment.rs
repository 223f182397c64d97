//! Payment provider callback for donation status updates.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
};

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::DonationStatus;
use crate::payments::{apply_webhook_event, parse_webhook_event, verify_webhook_signature};

/// Unauthenticated but signature-verified. The pipeline order is fixed:
/// verify the raw bytes, then parse, then touch the database.
pub async fn handle_payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>> {
    let signature = headers
        .get("X-Payment-Signature")
        .and_then(|v| v.to_str().ok());

    verify_webhook_signature(&state.payment, &body, signature)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let event = parse_webhook_event(&body)?;

    let mut conn = state.db.get()?;
    let outcome = match apply_webhook_event(&mut conn, &event) {
        Ok(outcome) => outcome,
        // Wire contract is 400 for an unknown session; the warn line is the
        // operator's cue that the provider referenced a session we never made.
        Err(AppError::NotFound(msg)) => {
            tracing::warn!(
                session_id = %event.session_id,
                "Webhook referenced an unknown payment session"
            );
            return Err(AppError::BadRequest(msg));
        }
        Err(e) => return Err(e),
    };

    // Only a delivery that genuinely moved the donation into `confirmed`
    // earns the donor a receipt; replays and no-op deliveries stay quiet.
    if outcome.transitioned && outcome.status == DonationStatus::Confirmed {
        // Best-effort receipt. The status update is already committed; a
        // failed send only produces a warning.
        let campaign_name = match outcome.donation.campaign_id.as_deref() {
            Some(campaign_id) => {
                queries::get_campaign_by_id(&conn, campaign_id)?.map(|c| c.name)
            }
            None => None,
        };

        let email = state.email.clone();
        let receipt_donation = outcome.donation.clone();
        tokio::spawn(async move {
            if let Err(e) = email
                .send_donation_receipt(&receipt_donation, campaign_name.as_deref())
                .await
            {
                tracing::warn!(
                    donation_id = %receipt_donation.id,
                    "Failed to send donation receipt: {}",
                    e
                );
            }
        });
    }

    Ok(Json(serde_json::json!({
        "ok": true,
        "donation_id": outcome.donation.id,
        "status": outcome.status.as_str(),
    })))
}
