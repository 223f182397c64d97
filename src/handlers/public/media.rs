use axum::extract::State;

use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::{Json, Query};
use crate::models::{Media, MediaFilters};
use crate::pagination::PaginationQuery;

/// Public: gallery media, optionally scoped to a project.
pub async fn list_media(
    State(state): State<AppState>,
    Query(filters): Query<MediaFilters>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<Media>>> {
    let conn = state.db.get()?;
    let (media, _total) =
        queries::list_media(&conn, &filters, pagination.limit(), pagination.skip())?;
    Ok(Json(media))
}
