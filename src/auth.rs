//! API key authentication for back-office accounts.
//!
//! Keys use a `bf_` brand prefix and are stored hashed; the full key is shown
//! exactly once, when the account is created. The `AdminUser` extractor is
//! the dependency-injected auth check guarding every admin handler.

use axum::{extract::FromRequestParts, http::request::Parts};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::db::{queries, AppState};
use crate::error::AppError;
use crate::models::{User, UserRole};
use crate::util::extract_bearer_token;

/// Number of leading key characters kept in clear for display ("bf_a1b2c3...")
const KEY_PREFIX_LEN: usize = 10;

/// Generate a new API key.
pub fn generate_api_key() -> String {
    format!("bf_{}", Uuid::new_v4().to_string().replace('-', ""))
}

/// Visible prefix of a key, for listings and audit trails.
pub fn key_prefix(api_key: &str) -> String {
    let end = api_key.len().min(KEY_PREFIX_LEN);
    format!("{}...", &api_key[..end])
}

/// Hash a secret for database lookups (API keys).
/// SHA-256 with an application salt, lowercase hex. Keys carry enough entropy
/// that a fast hash is sufficient here.
pub fn hash_secret(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(b"briskfarm-v1:");
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Authenticated admin caller.
///
/// Declared ahead of path/body extractors in admin handler signatures, so the
/// role check always runs before any lookup: probing a protected path with a
/// staff key or no key yields 403/401 regardless of whether the target
/// exists, and existence never leaks to non-admins.
#[derive(Clone)]
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;

        let conn = state.db.get()?;
        let user = queries::get_user_by_api_key(&conn, token)?.ok_or(AppError::Unauthorized)?;

        if user.role != UserRole::Admin {
            return Err(AppError::Forbidden("Insufficient permissions".into()));
        }

        Ok(AdminUser(user))
    }
}
