use axum::extract::State;

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{Campaign, CampaignFilters};
use crate::pagination::PaginationQuery;

/// Public: campaigns, ordered by sort_order then most recent.
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(filters): Query<CampaignFilters>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<Campaign>>> {
    let conn = state.db.get()?;
    let (campaigns, _total) =
        queries::list_campaigns(&conn, &filters, pagination.limit(), pagination.skip())?;
    Ok(Json(campaigns))
}

/// Public: campaign details by slug.
pub async fn get_campaign_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Campaign>> {
    let conn = state.db.get()?;
    let campaign = queries::get_campaign_by_slug(&conn, &slug)?
        .ok_or_else(|| AppError::NotFound("Campaign not found".into()))?;
    Ok(Json(campaign))
}
