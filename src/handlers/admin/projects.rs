use axum::{extract::State, http::StatusCode};

use crate::auth::AdminUser;
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::models::{CreateProject, Project, UpdateProject};

pub async fn create_project(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<CreateProject>,
) -> Result<(StatusCode, Json<Project>)> {
    input.validate()?;

    let conn = state.db.get()?;
    if queries::get_project_by_slug(&conn, &input.slug)?.is_some() {
        return Err(AppError::BadRequest("Project slug already exists".into()));
    }
    if let Some(ref service_id) = input.service_id {
        if queries::get_service_by_id(&conn, service_id)?.is_none() {
            return Err(AppError::BadRequest("Service not found".into()));
        }
    }

    let project = queries::create_project(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateProject>,
) -> Result<Json<Project>> {
    let conn = state.db.get()?;
    let project = queries::update_project(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if !queries::delete_project(&conn, &id)? {
        return Err(AppError::NotFound("Project not found".into()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
