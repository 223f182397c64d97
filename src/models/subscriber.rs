use serde::{Deserialize, Serialize};

use super::validate_email_format;
use crate::error::Result;

/// Newsletter subscriber.
#[derive(Debug, Clone, Serialize)]
pub struct Subscriber {
    pub id: String,
    pub email: String,
    pub created_at: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubscriber {
    pub email: String,
}

impl CreateSubscriber {
    pub fn validate(&self) -> Result<()> {
        validate_email_format(&self.email)
    }
}
