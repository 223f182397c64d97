use axum::extract::State;
use serde::Deserialize;

use crate::auth::AdminUser;
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{Donation, DonationFilters, DonationStatus};
use crate::pagination::{Paginated, PaginationQuery};
use crate::util::parse_query_datetime;

/// Raw query parameters for the donation listing. Dates arrive as ISO-8601
/// strings and are parsed once here, at the boundary.
#[derive(Debug, Default, Deserialize)]
pub struct DonationListQuery {
    pub campaign_id: Option<String>,
    pub status: Option<DonationStatus>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub min_amount: Option<i64>,
    pub max_amount: Option<i64>,
}

impl DonationListQuery {
    fn into_filters(self) -> Result<DonationFilters> {
        if self.min_amount.is_some_and(|v| v < 0) || self.max_amount.is_some_and(|v| v < 0) {
            return Err(AppError::BadRequest(
                "Amount filters must not be negative".into(),
            ));
        }

        Ok(DonationFilters {
            campaign_id: self.campaign_id,
            status: self.status,
            date_from: self
                .date_from
                .as_deref()
                .map(|v| parse_query_datetime("date_from", v))
                .transpose()?,
            date_to: self
                .date_to
                .as_deref()
                .map(|v| parse_query_datetime("date_to", v))
                .transpose()?,
            min_amount: self.min_amount,
            max_amount: self.max_amount,
        })
    }
}

/// Admin: list donations newest-first with optional filters. The admin view
/// serializes the full row, provider identifiers and card fingerprint
/// included.
pub async fn list_donations(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<DonationListQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Donation>>> {
    let filters = query.into_filters()?;

    let conn = state.db.get()?;
    let limit = pagination.limit();
    let skip = pagination.skip();
    let (donations, total) = queries::list_donations(&conn, &filters, limit, skip)?;
    Ok(Json(Paginated::new(donations, total, limit, skip)))
}

/// Admin: single donation by id.
pub async fn get_donation(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Donation>> {
    let conn = state.db.get()?;
    let donation = queries::get_donation_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Donation not found".into()))?;
    Ok(Json(donation))
}
