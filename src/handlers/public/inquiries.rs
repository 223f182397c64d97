use axum::{extract::State, http::StatusCode};

use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::Json;
use crate::models::{CreateInquiry, Inquiry};

/// Public: submit a contact-form inquiry. Lands in `new` status; the
/// configured inbox gets a best-effort notification.
pub async fn create_inquiry(
    State(state): State<AppState>,
    Json(input): Json<CreateInquiry>,
) -> Result<(StatusCode, Json<Inquiry>)> {
    input.validate()?;

    let conn = state.db.get()?;
    let inquiry = queries::create_inquiry(&conn, &input)?;

    if let Some(notify_email) = state.inquiry_notify_email.clone() {
        let email = state.email.clone();
        let full_name = inquiry.full_name.clone();
        let message = inquiry.message.clone();
        let inquiry_id = inquiry.id.clone();
        tokio::spawn(async move {
            if let Err(e) = email
                .send_inquiry_notification(&notify_email, &full_name, message.as_deref())
                .await
            {
                tracing::warn!(inquiry_id = %inquiry_id, "Failed to send inquiry notification: {}", e);
            }
        });
    }

    Ok((StatusCode::CREATED, Json(inquiry)))
}
