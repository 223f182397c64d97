use axum::extract::State;
use serde::Deserialize;

use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::{Json, Query};
use crate::models::Testimonial;
use crate::pagination::PaginationQuery;

#[derive(Debug, Default, Deserialize)]
pub struct TestimonialListQuery {
    pub is_featured: Option<bool>,
}

/// Public: active testimonials, optionally featured only.
pub async fn list_testimonials(
    State(state): State<AppState>,
    Query(query): Query<TestimonialListQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<Testimonial>>> {
    let conn = state.db.get()?;
    let (testimonials, _total) = queries::list_testimonials(
        &conn,
        false,
        query.is_featured,
        pagination.limit(),
        pagination.skip(),
    )?;
    Ok(Json(testimonials))
}
