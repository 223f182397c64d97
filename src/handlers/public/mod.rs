mod campaigns;
mod donations;
mod inquiries;
mod media;
mod projects;
mod services;
mod subscribers;
mod testimonials;

pub use campaigns::*;
pub use donations::*;
pub use inquiries::*;
pub use media::*;
pub use projects::*;
pub use services::*;
pub use subscribers::*;
pub use testimonials::*;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::db::AppState;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/services", get(list_services))
        .route("/services/{id}", get(get_service_by_slug))
        .route("/projects", get(list_projects))
        .route("/projects/{id}", get(get_project_by_slug))
        .route("/media", get(list_media))
        .route("/testimonials", get(list_testimonials))
        .route("/campaigns", get(list_campaigns))
        .route("/campaigns/{id}", get(get_campaign_by_slug))
        .route("/inquiries", post(create_inquiry))
        .route("/subscribers", post(create_subscriber))
        .route("/donations", post(create_donation_intent))
}
