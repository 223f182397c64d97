use axum::{extract::State, http::HeaderMap, http::StatusCode};

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::Json;
use crate::models::{CreateDonation, DonationIntentResponse, DonationPublic, PaymentMethod};
use crate::payments;
use crate::util::extract_request_info;

/// Public: create a donation intent.
///
/// Creates the donation in `pending`, opens the provider checkout session,
/// and returns the donor-safe projection plus the redirect URL. Campaigns
/// only take donations while `active` or `draft`.
pub async fn create_donation_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateDonation>,
) -> Result<(StatusCode, Json<DonationIntentResponse>)> {
    input.validate()?;

    let conn = state.db.get()?;

    if let Some(ref campaign_id) = input.campaign_id {
        let campaign = queries::get_campaign_by_id(&conn, campaign_id)?
            .ok_or_else(|| AppError::BadRequest("Campaign not found".into()))?;
        if !campaign.status.accepts_donations() {
            return Err(AppError::BadRequest(
                "Campaign is not accepting donations at this time".into(),
            ));
        }
    }

    let payment_method = PaymentMethod::normalize(input.payment_method.as_deref());
    let (ip_address, user_agent) = extract_request_info(&headers);

    let donation = queries::create_donation(
        &conn,
        &input,
        payment_method,
        ip_address.as_deref(),
        user_agent.as_deref(),
    )?;

    let session = payments::create_payment_session(&conn, &state.payment, &donation)?;

    Ok((
        StatusCode::CREATED,
        Json(DonationIntentResponse {
            donation: DonationPublic::from(&donation),
            payment_url: Some(session.payment_url),
            provider_session_id: Some(session.session_id),
        }),
    ))
}
