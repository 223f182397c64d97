use axum::{extract::State, http::StatusCode};

use crate::auth::AdminUser;
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateService, Service, UpdateService};
use crate::pagination::{Paginated, PaginationQuery};

pub async fn create_service(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<CreateService>,
) -> Result<(StatusCode, Json<Service>)> {
    input.validate()?;

    let conn = state.db.get()?;
    if queries::get_service_by_slug(&conn, &input.slug)?.is_some() {
        return Err(AppError::BadRequest("Service slug already exists".into()));
    }

    let service = queries::create_service(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(service)))
}

/// Admin listing includes inactive services.
pub async fn admin_list_services(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<Service>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let skip = pagination.skip();
    let (services, total) = queries::list_services(&conn, true, limit, skip)?;
    Ok(Json(Paginated::new(services, total, limit, skip)))
}

pub async fn update_service(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateService>,
) -> Result<Json<Service>> {
    let conn = state.db.get()?;
    let service = queries::update_service(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound("Service not found".into()))?;
    Ok(Json(service))
}

pub async fn delete_service(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if !queries::delete_service(&conn, &id)? {
        return Err(AppError::NotFound("Service not found".into()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
