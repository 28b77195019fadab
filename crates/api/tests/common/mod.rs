#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use koda_api::auth::jwt::{generate_token, IdentityConfig};
use koda_api::config::{PaymentWebhookConfig, ServerConfig};
use koda_api::router::build_app_router;
use koda_api::state::AppState;
use koda_core::payment_webhook::{signature_header, SIGNATURE_HEADER};
use koda_db::models::user::{ProvisionUser, UpdatePaymentAccount};
use koda_db::repositories::UserRepo;
use koda_events::EventBus;

pub const TEST_JWT_SECRET: &str = "test-identity-secret-long-enough-for-hmac";
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Build a test `ServerConfig` with safe defaults and known secrets.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        identity: IdentityConfig {
            secret: TEST_JWT_SECRET.to_string(),
            token_expiry_mins: 15,
        },
        payments: PaymentWebhookConfig {
            secret: TEST_WEBHOOK_SECRET.to_string(),
            tolerance_secs: 300,
        },
    }
}

/// Build the full application router, with the production middleware stack,
/// over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(EventBus::default()))
}

/// Like [`build_test_app`] but publishing to `event_bus`, so tests can
/// subscribe before sending requests.
pub fn build_test_app_with_bus(pool: PgPool, event_bus: Arc<EventBus>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A valid token for `subject` with the default `user` role.
pub fn token(subject: &str) -> String {
    generate_token(subject, None, None, &test_config().identity).unwrap()
}

/// A valid token for `subject` asserting `role`.
pub fn token_with_role(subject: &str, role: &str) -> String {
    generate_token(subject, None, Some(role), &test_config().identity).unwrap()
}

/// Provision `clerk_id` with a linked, fully onboarded payment account.
pub async fn make_sale_ready(pool: &PgPool, clerk_id: &str) {
    UserRepo::ensure_exists(
        pool,
        &ProvisionUser {
            clerk_id: clerk_id.to_string(),
            email: None,
            role: "user".to_string(),
        },
    )
    .await
    .unwrap();
    UserRepo::update_payment_account(
        pool,
        clerk_id,
        &UpdatePaymentAccount {
            stripe_account_id: format!("acct_{clerk_id}"),
            onboarding_complete: true,
        },
    )
    .await
    .unwrap();
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a payment notification signed with the test webhook secret.
pub async fn post_payment(app: Router, body: serde_json::Value) -> Response<Body> {
    let payload = serde_json::to_vec(&body).unwrap();
    let now = chrono::Utc::now().timestamp();
    let header = signature_header(TEST_WEBHOOK_SECRET, now, &payload);
    post_signed(app, payload, &header).await
}

/// POST raw bytes to the payment webhook with the given signature header.
pub async fn post_signed(app: Router, payload: Vec<u8>, signature: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/webhooks/payments")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(payload))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Parse a decimal serialized as a JSON string or number.
pub fn money(value: &serde_json::Value) -> rust_decimal::Decimal {
    match value {
        serde_json::Value::String(s) => s.parse().unwrap(),
        other => other.to_string().parse().unwrap(),
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A valid automation listing body.
pub fn listing_body(title: &str, price: u32) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Automates lead capture from forms into your CRM.",
        "price": price,
        "category": "Sales",
        "tags": ["crm", "leads"],
        "platform": "Zapier",
        "file_url": "https://files.example.com/zap.json",
        "version": "1.0.0",
    })
}

/// Create a listing through the API as a sale-ready `seller`, returning its id.
pub async fn create_listing(pool: &PgPool, seller: &str, title: &str, price: u32) -> i64 {
    make_sale_ready(pool, seller).await;
    let app = build_test_app(pool.clone());
    let response = post_auth(app, "/api/v1/listings", &token(seller), listing_body(title, price)).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}
