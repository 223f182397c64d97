use axum::{extract::State, http::StatusCode};

use crate::auth::AdminUser;
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::models::{Campaign, CreateCampaign, UpdateCampaign};

pub async fn create_campaign(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<CreateCampaign>,
) -> Result<(StatusCode, Json<Campaign>)> {
    input.validate()?;

    let conn = state.db.get()?;
    if queries::get_campaign_by_slug(&conn, &input.slug)?.is_some() {
        return Err(AppError::BadRequest("Campaign slug already exists".into()));
    }

    let campaign = queries::create_campaign(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(campaign)))
}

pub async fn update_campaign(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateCampaign>,
) -> Result<Json<Campaign>> {
    let conn = state.db.get()?;

    // A slug change must not collide with another campaign.
    if let Some(ref slug) = input.slug {
        if let Some(existing) = queries::get_campaign_by_slug(&conn, slug)? {
            if existing.id != id {
                return Err(AppError::BadRequest("Campaign slug already exists".into()));
            }
        }
    }

    let campaign = queries::update_campaign(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound("Campaign not found".into()))?;
    Ok(Json(campaign))
}

/// DELETE archives the campaign rather than dropping the row; donations stay
/// attached to their campaign history.
pub async fn archive_campaign(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Campaign>> {
    let conn = state.db.get()?;
    let campaign = queries::archive_campaign(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Campaign not found".into()))?;
    Ok(Json(campaign))
}
