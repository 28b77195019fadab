use koda_core::payment_webhook::DEFAULT_TOLERANCE_SECS;

use crate::auth::jwt::IdentityConfig;

/// Server configuration loaded from environment variables.
///
/// Everything except the two secrets has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Time allowed for background tasks to drain after shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Verification settings for identity-provider tokens.
    pub identity: IdentityConfig,
    /// Signature settings for payment-completion webhooks.
    pub payments: PaymentWebhookConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    ///
    /// # Panics
    ///
    /// Panics on unparsable values and on missing secrets, see
    /// [`IdentityConfig::from_env`] and [`PaymentWebhookConfig::from_env`].
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            identity: IdentityConfig::from_env(),
            payments: PaymentWebhookConfig::from_env(),
        }
    }
}

/// Shared secret and clock tolerance for payment webhook signatures.
#[derive(Debug, Clone)]
pub struct PaymentWebhookConfig {
    pub secret: String,
    /// Maximum age of a signed timestamp, in seconds.
    pub tolerance_secs: i64,
}

impl PaymentWebhookConfig {
    /// | Env Var                          | Required | Default |
    /// |----------------------------------|----------|---------|
    /// | `PAYMENT_WEBHOOK_SECRET`         | **yes**  | --      |
    /// | `PAYMENT_WEBHOOK_TOLERANCE_SECS` | no       | `300`   |
    ///
    /// # Panics
    ///
    /// Panics if `PAYMENT_WEBHOOK_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("PAYMENT_WEBHOOK_SECRET")
            .expect("PAYMENT_WEBHOOK_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "PAYMENT_WEBHOOK_SECRET must not be empty");

        let tolerance_secs: i64 = std::env::var("PAYMENT_WEBHOOK_TOLERANCE_SECS")
            .unwrap_or_else(|_| DEFAULT_TOLERANCE_SECS.to_string())
            .parse()
            .expect("PAYMENT_WEBHOOK_TOLERANCE_SECS must be a valid i64");

        Self {
            secret,
            tolerance_secs,
        }
    }
}
