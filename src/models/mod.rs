pub mod campaign;
pub mod donation;
pub mod inquiry;
pub mod media;
pub mod project;
pub mod service;
pub mod subscriber;
pub mod testimonial;
pub mod user;

pub use campaign::*;
pub use donation::*;
pub use inquiry::*;
pub use media::*;
pub use project::*;
pub use service::*;
pub use subscriber::*;
pub use testimonial::*;
pub use user::*;

use crate::error::{AppError, Result};

/// Basic email format validation.
///
/// Checks for exactly one @, a non-empty local part, and a dotted domain.
/// Intentionally permissive - a sanity check, not RFC 5322.
pub(crate) fn validate_email_format(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(AppError::BadRequest("Email cannot be empty".into()));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return Err(AppError::BadRequest("Invalid email format".into()));
    }

    let (local, domain) = (parts[0], parts[1]);

    if local.is_empty() || local.contains(' ') {
        return Err(AppError::BadRequest("Invalid email format".into()));
    }

    if domain.is_empty()
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(AppError::BadRequest("Invalid email format".into()));
    }

    Ok(())
}
