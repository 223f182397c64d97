use axum::{extract::State, http::StatusCode};

use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::Json;
use crate::models::{CreateSubscriber, Subscriber};

/// Public: newsletter signup.
///
/// Idempotent: an already-subscribed email returns the existing row instead
/// of an error, so double-submits never bother the visitor.
pub async fn create_subscriber(
    State(state): State<AppState>,
    Json(input): Json<CreateSubscriber>,
) -> Result<(StatusCode, Json<Subscriber>)> {
    input.validate()?;

    let conn = state.db.get()?;
    if let Some(existing) = queries::get_subscriber_by_email(&conn, &input.email)? {
        return Ok((StatusCode::CREATED, Json(existing)));
    }

    let subscriber = queries::create_subscriber(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(subscriber)))
}
