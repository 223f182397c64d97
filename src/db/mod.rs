mod schema;
pub mod from_row;
pub mod queries;

pub use schema::init_db;

use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::PaymentConfig;
use crate::email::EmailService;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    /// Payment provider settings, injected so the webhook verifier and
    /// session service never read process globals
    pub payment: PaymentConfig,
    pub email: Arc<EmailService>,
    /// Inbox notified about new inquiries (None = skip)
    pub inquiry_notify_email: Option<String>,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    // Foreign keys are off by default in SQLite; the donation/campaign and
    // media/project relations rely on ON DELETE behavior.
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    Pool::builder().max_size(10).build(manager)
}
