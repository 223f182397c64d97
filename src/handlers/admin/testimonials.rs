use axum::{extract::State, http::StatusCode};

use crate::auth::AdminUser;
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateTestimonial, Testimonial, UpdateTestimonial};
use crate::pagination::{Paginated, PaginationQuery};

pub async fn create_testimonial(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<CreateTestimonial>,
) -> Result<(StatusCode, Json<Testimonial>)> {
    input.validate()?;

    let conn = state.db.get()?;
    let testimonial = queries::create_testimonial(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(testimonial)))
}

/// Admin listing includes inactive testimonials.
pub async fn admin_list_testimonials(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Testimonial>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let skip = pagination.skip();
    let (testimonials, total) = queries::list_testimonials(&conn, true, None, limit, skip)?;
    Ok(Json(Paginated::new(testimonials, total, limit, skip)))
}

pub async fn update_testimonial(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateTestimonial>,
) -> Result<Json<Testimonial>> {
    let conn = state.db.get()?;
    let testimonial = queries::update_testimonial(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound("Testimonial not found".into()))?;
    Ok(Json(testimonial))
}

pub async fn delete_testimonial(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if !queries::delete_testimonial(&conn, &id)? {
        return Err(AppError::NotFound("Testimonial not found".into()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
