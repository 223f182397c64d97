use axum::extract::State;

use crate::auth::AdminUser;
use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::Json;

/// Aggregate counts for the admin dashboard.
pub async fn dashboard_stats(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<queries::DashboardStats>> {
    let conn = state.db.get()?;
    Ok(Json(queries::dashboard_stats(&conn)?))
}
