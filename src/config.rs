use std::env;

/// Payment provider settings for the donation module.
///
/// Injected into the session service and webhook verifier through `AppState`
/// so tests can swap secrets per-case without touching process state.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Provider name recorded on donations and embedded in session ids
    pub provider_name: String,
    /// Secret for HMAC-SHA256 webhook signature verification.
    /// None = verification always fails (secret not configured).
    pub webhook_secret: Option<String>,
    /// Reserved for a real provider integration, unused by the dummy provider
    pub public_key: Option<String>,
    pub secret_key: Option<String>,
}

impl PaymentConfig {
    pub fn from_env() -> Self {
        Self {
            provider_name: env::var("PAYMENT_PROVIDER_NAME")
                .unwrap_or_else(|_| "dummy".to_string()),
            webhook_secret: env::var("PAYMENT_WEBHOOK_SECRET").ok(),
            public_key: env::var("PAYMENT_PUBLIC_KEY").ok(),
            secret_key: env::var("PAYMENT_SECRET_KEY").ok(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub cors_origins: Vec<String>,
    pub bootstrap_admin_email: Option<String>,
    pub dev_mode: bool,
    pub payment: PaymentConfig,
    /// Resend API key for outgoing email (receipts, inquiry notifications).
    /// None = log-only mode.
    pub resend_api_key: Option<String>,
    pub email_from: String,
    /// Inbox that receives new-inquiry notifications
    pub inquiry_notify_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("BRISKFARM_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        // Comma-separated list, e.g. "https://briskfarm.example,https://www.briskfarm.example"
        let cors_origins = env::var("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "briskfarm.db".to_string()),
            cors_origins,
            bootstrap_admin_email: env::var("BOOTSTRAP_ADMIN_EMAIL").ok(),
            dev_mode,
            payment: PaymentConfig::from_env(),
            resend_api_key: env::var("RESEND_API_KEY").ok(),
            email_from: env::var("EMAIL_FROM")
                .unwrap_or_else(|_| "no-reply@briskfarm.example".to_string()),
            inquiry_notify_email: env::var("INQUIRY_NOTIFY_EMAIL").ok(),
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
