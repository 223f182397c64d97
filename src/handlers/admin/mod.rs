mod campaigns;
mod donations;
mod inquiries;
mod media;
mod projects;
mod services;
mod stats;
mod subscribers;
mod testimonials;
mod users;

pub use campaigns::*;
pub use donations::*;
pub use inquiries::*;
pub use media::*;
pub use projects::*;
pub use services::*;
pub use stats::*;
pub use subscribers::*;
pub use testimonials::*;
pub use users::*;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::db::AppState;

/// Back-office routes. Every handler takes the `AdminUser` extractor, which
/// runs the bearer-key RBAC check before any path or body extraction.
pub fn router() -> Router<AppState> {
    Router::new()
        // Content management
        .route("/services", post(create_service))
        .route("/admin/services", get(admin_list_services))
        .route("/services/{id}", put(update_service))
        .route("/services/{id}", delete(delete_service))
        .route("/projects", post(create_project))
        .route("/projects/{id}", put(update_project))
        .route("/projects/{id}", delete(delete_project))
        .route("/media", post(create_media))
        .route("/media/{id}", put(update_media))
        .route("/media/{id}", delete(delete_media))
        .route("/testimonials", post(create_testimonial))
        .route("/admin/testimonials", get(admin_list_testimonials))
        .route("/testimonials/{id}", put(update_testimonial))
        .route("/testimonials/{id}", delete(delete_testimonial))
        // Lead capture
        .route("/inquiries", get(list_inquiries))
        .route("/inquiries/{id}", get(get_inquiry))
        .route("/inquiries/{id}/status", patch(update_inquiry_status))
        .route("/inquiries/{id}", delete(delete_inquiry))
        .route("/subscribers", get(list_subscribers))
        .route("/subscribers/{id}", delete(delete_subscriber))
        // Donations & campaigns
        .route("/campaigns", post(create_campaign))
        .route("/campaigns/{id}", put(update_campaign))
        .route("/campaigns/{id}", delete(archive_campaign))
        .route("/donations", get(list_donations))
        .route("/donations/{id}", get(get_donation))
        // Accounts & dashboard
        .route("/users", post(create_user))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}/role", patch(update_user_role))
        .route("/stats", get(dashboard_stats))
}
