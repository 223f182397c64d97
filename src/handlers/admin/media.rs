use axum::{extract::State, http::StatusCode};

use crate::auth::AdminUser;
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path};
use crate::models::{CreateMedia, Media, UpdateMedia};

pub async fn create_media(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<CreateMedia>,
) -> Result<(StatusCode, Json<Media>)> {
    input.validate()?;

    let conn = state.db.get()?;
    if let Some(ref project_id) = input.project_id {
        if queries::get_project_by_id(&conn, project_id)?.is_none() {
            return Err(AppError::BadRequest("Project not found".into()));
        }
    }

    let media = queries::create_media(&conn, &input)?;
    Ok((StatusCode::CREATED, Json(media)))
}

pub async fn update_media(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateMedia>,
) -> Result<Json<Media>> {
    let conn = state.db.get()?;
    let media = queries::update_media(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound("Media not found".into()))?;
    Ok(Json(media))
}

pub async fn delete_media(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if !queries::delete_media(&conn, &id)? {
        return Err(AppError::NotFound("Media not found".into()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
