use serde::{Deserialize, Serialize};

use super::validate_email_format;
use crate::error::{AppError, Result};

/// Back-office role. Admin gets the full management API; staff accounts exist
/// so access can be granted later without re-issuing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Staff => "staff",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "admin" => Ok(UserRole::Admin),
            "staff" => Ok(UserRole::Staff),
            _ => Err(format!("invalid user role: {}", s)),
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Back-office account. Authenticates with a bearer API key; only the hash is
/// stored, the full key is returned once at creation.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    /// Visible key prefix for listings (e.g. "bf_a1b2c3...")
    pub api_key_prefix: String,
    #[serde(skip_serializing)]
    pub api_key_hash: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub role: UserRole,
}

impl CreateUser {
    pub fn validate(&self) -> Result<()> {
        validate_email_format(&self.email)?;
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Name cannot be empty".into()));
        }
        Ok(())
    }
}

/// Admin payload for promoting/demoting an account or toggling access.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRole {
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

/// Response for user creation: the only time the API key is visible.
#[derive(Debug, Serialize)]
pub struct CreatedUser {
    pub user: User,
    pub api_key: String,
}
