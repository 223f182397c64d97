use axum::extract::State;

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::Service;
use crate::pagination::PaginationQuery;

/// Public: active services, ordered for display.
pub async fn list_services(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<Service>>> {
    let conn = state.db.get()?;
    let (services, _total) =
        queries::list_services(&conn, false, pagination.limit(), pagination.skip())?;
    Ok(Json(services))
}

/// Public: service details by slug.
pub async fn get_service_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Service>> {
    let conn = state.db.get()?;
    let service = queries::get_service_by_slug(&conn, &slug)?
        .filter(|s| s.is_active)
        .ok_or_else(|| AppError::NotFound("Service not found".into()))?;
    Ok(Json(service))
}
