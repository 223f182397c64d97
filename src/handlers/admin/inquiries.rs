use axum::extract::State;

use crate::auth::AdminUser;
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{Inquiry, InquiryFilters, UpdateInquiryStatus};
use crate::pagination::{Paginated, PaginationQuery};

pub async fn list_inquiries(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(filters): Query<InquiryFilters>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Inquiry>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let skip = pagination.skip();
    let (inquiries, total) = queries::list_inquiries(&conn, filters.status, limit, skip)?;
    Ok(Json(Paginated::new(inquiries, total, limit, skip)))
}

pub async fn get_inquiry(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<Inquiry>> {
    let conn = state.db.get()?;
    let inquiry = queries::get_inquiry_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("Inquiry not found".into()))?;
    Ok(Json(inquiry))
}

pub async fn update_inquiry_status(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateInquiryStatus>,
) -> Result<Json<Inquiry>> {
    let conn = state.db.get()?;
    let inquiry = queries::update_inquiry_status(&conn, &id, input.status)?
        .ok_or_else(|| AppError::NotFound("Inquiry not found".into()))?;
    Ok(Json(inquiry))
}

pub async fn delete_inquiry(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if !queries::delete_inquiry(&conn, &id)? {
        return Err(AppError::NotFound("Inquiry not found".into()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
