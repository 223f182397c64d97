use axum::extract::State;

use crate::db::{queries, AppState};
use crate::error::{AppError, Result};
use crate::extractors::{Json, Path, Query};
use crate::models::{Project, ProjectFilters};
use crate::pagination::PaginationQuery;

/// Public: portfolio projects with optional status/service/featured filters.
pub async fn list_projects(
    State(state): State<AppState>,
    Query(filters): Query<ProjectFilters>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<Project>>> {
    let conn = state.db.get()?;
    let (projects, _total) =
        queries::list_projects(&conn, &filters, pagination.limit(), pagination.skip())?;
    Ok(Json(projects))
}

/// Public: project details by slug.
pub async fn get_project_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Project>> {
    let conn = state.db.get()?;
    let project = queries::get_project_by_slug(&conn, &slug)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
    Ok(Json(project))
}
