use axum::{extract::State, http::StatusCode};
use serde::Deserialize;

use crate::auth::{generate_api_key, AdminUser};
use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{CreateUser, CreatedUser, UpdateUserRole, User, UserRole};
use crate::pagination::{Paginated, PaginationQuery};

/// Create a staff/admin account. The generated API key is in the response
/// and nowhere else; only its hash is stored.
pub async fn create_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<CreatedUser>)> {
    input.validate()?;

    let conn = state.db.get()?;
    if queries::get_user_by_email(&conn, &input.email)?.is_some() {
        return Err(AppError::Conflict("Email already in use".into()));
    }

    let api_key = generate_api_key();
    let user = queries::create_user(&conn, &input, &api_key)?;

    Ok((StatusCode::CREATED, Json(CreatedUser { user, api_key })))
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<UserRole>,
}

pub async fn list_users(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<UserListQuery>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Paginated<User>>> {
    let conn = state.db.get()?;
    let limit = pagination.limit();
    let skip = pagination.skip();
    let (users, total) = queries::list_users(&conn, query.role, limit, skip)?;
    Ok(Json(Paginated::new(users, total, limit, skip)))
}

pub async fn get_user(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<Json<User>> {
    let conn = state.db.get()?;
    let user = queries::get_user_by_id(&conn, &id)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}

/// Promote/demote an account or toggle its access.
pub async fn update_user_role(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateUserRole>,
) -> Result<Json<User>> {
    let conn = state.db.get()?;
    let user = queries::update_user_role(&conn, &id, &input)?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    Ok(Json(user))
}
