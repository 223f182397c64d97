use axum::http::{HeaderValue, Method};
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::sync::Arc;

use briskfarm::auth::generate_api_key;
use briskfarm::config::Config;
use briskfarm::db::{create_pool, init_db, queries, AppState};
use briskfarm::email::EmailService;
use briskfarm::handlers;
use briskfarm::models::{CreateCampaign, CreateService, CreateUser, UserRole};

#[derive(Parser, Debug)]
#[command(name = "briskfarm")]
#[command(about = "Website backend for Brisk Farm Solutions & Construction Co.")]
struct Cli {
    /// Seed the database with dev data (admin account, sample service and campaign)
    #[arg(long)]
    seed: bool,
}

/// Create the first admin account if no users exist yet.
/// The API key is printed once and never recoverable afterwards.
fn bootstrap_first_admin(state: &AppState, email: &str) {
    let conn = state.db.get().expect("Failed to get db connection for bootstrap");

    let count = queries::count_users(&conn).expect("Failed to count users");
    if count > 0 {
        tracing::info!("Users already exist, skipping bootstrap");
        return;
    }

    let api_key = generate_api_key();
    let input = CreateUser {
        email: email.to_string(),
        name: "Bootstrap Admin".to_string(),
        role: UserRole::Admin,
    };
    let user = queries::create_user(&conn, &input, &api_key)
        .expect("Failed to create bootstrap admin");

    tracing::info!("============================================");
    tracing::info!("BOOTSTRAP ADMIN CREATED");
    tracing::info!("Email: {}", user.email);
    tracing::info!("API Key: {}", api_key);
    tracing::info!("============================================");
    tracing::info!("SAVE THIS API KEY - IT WILL NOT BE SHOWN AGAIN");
    tracing::info!("============================================");
}

/// Seed dev data: admin account, one service, one campaign.
/// Only runs in dev mode and when the database is empty.
fn seed_dev_data(state: &AppState) {
    let conn = state.db.get().expect("Failed to get db connection for seeding");

    let count = queries::count_users(&conn).expect("Failed to count users");
    if count > 0 {
        tracing::info!("Database already has data, skipping seed");
        return;
    }

    let api_key = generate_api_key();
    let admin = queries::create_user(
        &conn,
        &CreateUser {
            email: "dev@briskfarm.local".to_string(),
            name: "Dev Admin".to_string(),
            role: UserRole::Admin,
        },
        &api_key,
    )
    .expect("Failed to create dev admin");

    let service = queries::create_service(
        &conn,
        &CreateService {
            name: "Solar Irrigation Systems".to_string(),
            slug: "solar-irrigation-systems".to_string(),
            short_description: Some("Off-grid solar pumping and drip irrigation".to_string()),
            description: None,
            tagline: None,
            category: Some("agribusiness".to_string()),
            icon: None,
            hero_image_url: None,
            is_active: true,
            display_order: 0,
        },
    )
    .expect("Failed to create dev service");

    let campaign = queries::create_campaign(
        &conn,
        &CreateCampaign {
            name: "Community Boreholes 2026".to_string(),
            slug: "community-boreholes-2026".to_string(),
            short_description: Some("Clean water points for five villages".to_string()),
            description: None,
            currency: "UGX".to_string(),
            target_amount: Some(50_000_000),
            status: briskfarm::models::CampaignStatus::Active,
            is_featured: true,
            sort_order: 0,
            hero_image_url: None,
            start_date: None,
            end_date: None,
        },
    )
    .expect("Failed to create dev campaign");

    tracing::info!("============================================");
    tracing::info!("DEV DATA SEEDED");
    tracing::info!("Admin: {}", admin.email);
    tracing::info!("Admin API Key: {}", api_key);
    tracing::info!("Service: {} ({})", service.name, service.slug);
    tracing::info!("Campaign: {} ({})", campaign.name, campaign.slug);
    tracing::info!("============================================");
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.cors_origins.is_empty() {
        // No origins configured: stay permissive in dev, locked down otherwise
        if config.dev_mode {
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
        }
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(Any)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "briskfarm=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    if config.dev_mode {
        tracing::info!("Running in DEVELOPMENT mode");
    }
    if config.payment.webhook_secret.is_none() {
        tracing::warn!("PAYMENT_WEBHOOK_SECRET is not set; donation webhooks will be rejected");
    }

    let db_pool = create_pool(&config.database_path).expect("Failed to create database pool");
    {
        let conn = db_pool.get().expect("Failed to get connection");
        init_db(&conn).expect("Failed to initialize database");
    }

    let state = AppState {
        db: db_pool,
        payment: config.payment.clone(),
        email: Arc::new(EmailService::new(
            config.resend_api_key.clone(),
            config.email_from.clone(),
        )),
        inquiry_notify_email: config.inquiry_notify_email.clone(),
    };

    if cli.seed {
        if !config.dev_mode {
            tracing::warn!("--seed flag ignored: not in dev mode (set BRISKFARM_ENV=dev)");
        } else {
            seed_dev_data(&state);
        }
    }

    if let Some(ref email) = config.bootstrap_admin_email {
        bootstrap_first_admin(&state, email);
    }

    let api = Router::new()
        .merge(handlers::public::router())
        .merge(handlers::webhooks::router())
        .merge(handlers::admin::router());

    let app = Router::new()
        .nest("/api/v1", api)
        .layer(build_cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("briskfarm server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Failed to start server");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received, stopping server...");
}
