//! HTTP-level integration tests for the `/conversations` resource.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, build_test_app, build_test_app_with_bus, get_auth, post_auth, token};
use koda_events::{EventBus, EVENT_MESSAGE_CREATED};
use serde_json::json;
use sqlx::PgPool;

/// Provision `clerk_id` by letting them call `/users/me` once.
async fn provision(pool: &PgPool, clerk_id: &str) {
    let response = get_auth(build_test_app(pool.clone()), "/api/v1/users/me", &token(clerk_id)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn start(pool: &PgPool, from: &str, to: &str) -> i64 {
    let response = post_auth(
        build_test_app(pool.clone()),
        "/api/v1/conversations",
        &token(from),
        json!({ "recipient_id": to }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_i64().unwrap()
}

async fn send(pool: &PgPool, conversation_id: i64, from: &str, body: &str) -> axum::http::Response<axum::body::Body> {
    post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/conversations/{conversation_id}/messages"),
        &token(from),
        json!({ "body": body }),
    )
    .await
}

// ---------------------------------------------------------------------------
// Starting conversations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn start_is_idempotent_in_both_directions(pool: PgPool) {
    provision(&pool, "user_alice").await;
    provision(&pool, "user_bob").await;

    let first = start(&pool, "user_alice", "user_bob").await;
    let again = start(&pool, "user_alice", "user_bob").await;
    let reverse = start(&pool, "user_bob", "user_alice").await;

    assert_eq!(first, again);
    assert_eq!(first, reverse);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cannot_message_yourself(pool: PgPool) {
    let response = post_auth(
        build_test_app(pool),
        "/api/v1/conversations",
        &token("user_alice"),
        json!({ "recipient_id": "user_alice" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["key"], "errors.message_self");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_recipient_returns_404(pool: PgPool) {
    let response = post_auth(
        build_test_app(pool),
        "/api/v1/conversations",
        &token("user_alice"),
        json!({ "recipient_id": "user_nobody" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["key"], "errors.user_not_found");
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn messages_flow_with_unread_counts(pool: PgPool) {
    provision(&pool, "user_alice").await;
    provision(&pool, "user_bob").await;
    let id = start(&pool, "user_alice", "user_bob").await;

    for body in ["Hi Bob", "  Is the Zap still maintained?  "] {
        let response = send(&pool, id, "user_alice", body).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let bob = token("user_bob");
    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/conversations/unread-count",
        &bob,
    )
    .await;
    assert_eq!(body_json(response).await["count"], 2);

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/conversations", &bob).await;
    let json = body_json(response).await;
    let summary = &json["data"][0];
    assert_eq!(summary["id"], id);
    assert_eq!(summary["counterpart_id"], "user_alice");
    assert_eq!(summary["unread_count"], 2);
    assert_eq!(summary["last_message"], "Is the Zap still maintained?");

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/conversations/{id}/messages"),
        &bob,
    )
    .await;
    let json = body_json(response).await;
    let bodies: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["Hi Bob", "Is the Zap still maintained?"]);

    let response = post_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/conversations/{id}/read"),
        &bob,
        json!({}),
    )
    .await;
    assert_eq!(body_json(response).await["marked_read"], 2);

    let response = get_auth(
        build_test_app(pool),
        "/api/v1/conversations/unread-count",
        &bob,
    )
    .await;
    assert_eq!(body_json(response).await["count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn blank_message_is_rejected(pool: PgPool) {
    provision(&pool, "user_alice").await;
    provision(&pool, "user_bob").await;
    let id = start(&pool, "user_alice", "user_bob").await;

    let response = send(&pool, id, "user_alice", "   ").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "body");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn outsiders_cannot_read_or_write(pool: PgPool) {
    provision(&pool, "user_alice").await;
    provision(&pool, "user_bob").await;
    let id = start(&pool, "user_alice", "user_bob").await;

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/conversations/{id}/messages"),
        &token("user_eve"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["key"], "errors.conversation_forbidden");

    let response = send(&pool, id, "user_eve", "hello").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sending_publishes_event_for_counterpart(pool: PgPool) {
    provision(&pool, "user_alice").await;
    provision(&pool, "user_bob").await;
    let id = start(&pool, "user_alice", "user_bob").await;

    let bus = Arc::new(EventBus::default());
    let mut rx = bus.subscribe();
    let response = post_auth(
        build_test_app_with_bus(pool, Arc::clone(&bus)),
        &format!("/api/v1/conversations/{id}/messages"),
        &token("user_alice"),
        json!({ "body": "ping" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event_type, EVENT_MESSAGE_CREATED);
    assert_eq!(event.recipient_id.as_deref(), Some("user_bob"));
    assert_eq!(event.payload["conversation_id"], id);
}
