use axum::extract::State;

use crate::auth::AdminUser;
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::Subscriber;
use crate::pagination::{Paginated, PaginationQuery};

pub async fn list_subscribers(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Subscriber>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let skip = pagination.skip();
    let (subscribers, total) = queries::list_subscribers(&conn, limit, skip)?;
    Ok(Json(Paginated::new(subscribers, total, limit, skip)))
}

pub async fn delete_subscriber(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if !queries::delete_subscriber(&conn, &id)? {
        return Err(AppError::NotFound("Subscriber not found".into()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
