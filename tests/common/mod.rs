//! Test utilities and fixtures for briskfarm integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::OpenFlags;
use std::sync::Arc;

pub use briskfarm::auth::generate_api_key;
pub use briskfarm::config::PaymentConfig;
pub use briskfarm::db::{init_db, queries, AppState, DbPool};
pub use briskfarm::email::EmailService;
pub use briskfarm::models::*;

pub const TEST_WEBHOOK_SECRET: &str = "testsecret";

/// In-memory pool backed by a shared-cache database so every pooled
/// connection sees the same data.
fn memory_pool() -> DbPool {
    let uri = format!(
        "file:briskfarm-test-{}?mode=memory&cache=shared",
        uuid::Uuid::new_v4()
    );
    let manager = SqliteConnectionManager::file(uri)
        .with_flags(
            OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE,
        )
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder().max_size(4).build(manager).unwrap();
    {
        let conn = pool.get().unwrap();
        init_db(&conn).unwrap();
    }
    pool
}

/// AppState with in-memory storage and the test webhook secret.
pub fn create_test_app_state() -> AppState {
    create_test_app_state_with_secret(Some(TEST_WEBHOOK_SECRET))
}

/// AppState with an explicit webhook secret (None = unconfigured).
pub fn create_test_app_state_with_secret(webhook_secret: Option<&str>) -> AppState {
    AppState {
        db: memory_pool(),
        payment: PaymentConfig {
            provider_name: "dummy".to_string(),
            webhook_secret: webhook_secret.map(String::from),
            public_key: None,
            secret_key: None,
        },
        email: Arc::new(EmailService::new(None, "test@briskfarm.local".to_string())),
        inquiry_notify_email: None,
    }
}

/// Full application router, mounted exactly like main().
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(briskfarm::handlers::public::router())
        .merge(briskfarm::handlers::webhooks::router())
        .merge(briskfarm::handlers::admin::router());
    Router::new().nest("/api/v1", api).with_state(state)
}

/// Create an account directly in the database, returning it with its key.
pub fn create_test_user(state: &AppState, email: &str, role: UserRole) -> (User, String) {
    let conn = state.db.get().unwrap();
    let api_key = generate_api_key();
    let input = CreateUser {
        email: email.to_string(),
        name: format!("Test {}", email),
        role,
    };
    let user = queries::create_user(&conn, &input, &api_key).expect("Failed to create test user");
    (user, api_key)
}

pub fn create_test_admin(state: &AppState) -> (User, String) {
    create_test_user(state, "admin@briskfarm.local", UserRole::Admin)
}

pub fn create_test_staff(state: &AppState) -> (User, String) {
    create_test_user(state, "staff@briskfarm.local", UserRole::Staff)
}

/// Create a campaign directly in the database.
pub fn create_test_campaign(state: &AppState, slug: &str, status: CampaignStatus) -> Campaign {
    let conn = state.db.get().unwrap();
    let input = CreateCampaign {
        name: format!("Campaign {}", slug),
        slug: slug.to_string(),
        short_description: None,
        description: None,
        currency: "UGX".to_string(),
        target_amount: Some(1_000_000),
        status,
        is_featured: false,
        sort_order: 0,
        hero_image_url: None,
        start_date: None,
        end_date: None,
    };
    queries::create_campaign(&conn, &input).expect("Failed to create test campaign")
}

/// Hex HMAC-SHA256 over the raw body, as the provider would sign it.
pub fn sign_payload(secret: &str, body: &[u8]) -> String {
    use hmac::{Hmac, Mac};
    use sha2::Sha256;

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Build a request. `token` adds a bearer Authorization header; `body` sends
/// JSON.
pub fn request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Build a webhook delivery with a raw body and optional signature header.
pub fn webhook_request(uri: &str, body: Vec<u8>, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("X-Payment-Signature", signature);
    }
    builder.body(Body::from(body)).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("Response should be valid JSON")
}
