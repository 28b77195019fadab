//! HTTP-level integration tests for the cart, favorites, and current-user
//! endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_listing, delete_auth, get_auth, post_auth, put_auth, token,
};
use serde_json::json;
use sqlx::PgPool;

fn ids(json: &serde_json::Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["id"].as_i64().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn new_user_has_empty_cart(pool: PgPool) {
    let response = get_auth(build_test_app(pool), "/api/v1/cart", &token("user_buyer")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(ids(&json).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sync_replaces_cart_dropping_duplicates_and_missing(pool: PgPool) {
    let a = create_listing(&pool, "user_seller", "Lead Router", 49).await;
    let b = create_listing(&pool, "user_seller", "Invoice Chaser", 19).await;
    let buyer = token("user_buyer");

    let response = put_auth(
        build_test_app(pool.clone()),
        "/api/v1/cart",
        &buyer,
        json!({ "items": [b, a, b, 999_999] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(ids(&json), vec![b, a]);

    let response = get_auth(build_test_app(pool), "/api/v1/cart", &buyer).await;
    let json = body_json(response).await;
    assert_eq!(ids(&json), vec![b, a]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn add_is_idempotent_and_remove_drops_item(pool: PgPool) {
    let a = create_listing(&pool, "user_seller", "Lead Router", 49).await;
    let buyer = token("user_buyer");
    let uri = format!("/api/v1/cart/items/{a}");

    for _ in 0..2 {
        let response = post_auth(build_test_app(pool.clone()), &uri, &buyer, json!({})).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(ids(&json), vec![a]);
    }

    let response = delete_auth(build_test_app(pool), &uri, &buyer).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(ids(&json).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn seller_cannot_add_own_listing(pool: PgPool) {
    let a = create_listing(&pool, "user_seller", "Lead Router", 49).await;

    let response = post_auth(
        build_test_app(pool),
        &format!("/api/v1/cart/items/{a}"),
        &token("user_seller"),
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["rule"], "not_own");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn adding_unknown_listing_returns_404(pool: PgPool) {
    let response = post_auth(
        build_test_app(pool),
        "/api/v1/cart/items/999999",
        &token("user_buyer"),
        json!({}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn clear_empties_cart(pool: PgPool) {
    let a = create_listing(&pool, "user_seller", "Lead Router", 49).await;
    let buyer = token("user_buyer");
    put_auth(
        build_test_app(pool.clone()),
        "/api/v1/cart",
        &buyer,
        json!({ "items": [a] }),
    )
    .await;

    let response = delete_auth(build_test_app(pool.clone()), "/api/v1/cart", &buyer).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(build_test_app(pool), "/api/v1/cart", &buyer).await;
    let json = body_json(response).await;
    assert!(ids(&json).is_empty());
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn favorites_toggle(pool: PgPool) {
    let a = create_listing(&pool, "user_seller", "Lead Router", 49).await;
    let buyer = token("user_buyer");
    let uri = format!("/api/v1/favorites/{a}");

    let response = post_auth(build_test_app(pool.clone()), &uri, &buyer, json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["favorited"], true);

    let response = get_auth(build_test_app(pool.clone()), "/api/v1/favorites", &buyer).await;
    let json = body_json(response).await;
    assert_eq!(ids(&json), vec![a]);

    let response = delete_auth(build_test_app(pool.clone()), &uri, &buyer).await;
    let json = body_json(response).await;
    assert_eq!(json["favorited"], false);

    let response = get_auth(build_test_app(pool), "/api/v1/favorites", &buyer).await;
    let json = body_json(response).await;
    assert!(ids(&json).is_empty());
}

// ---------------------------------------------------------------------------
// Current user
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn first_request_provisions_user(pool: PgPool) {
    let response = get_auth(build_test_app(pool), "/api/v1/users/me", &token("user_fresh")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["clerk_id"], "user_fresh");
    assert_eq!(json["role"], "user");
    assert_eq!(json["is_banned"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_update_validates_fields(pool: PgPool) {
    let me = token("user_profile");

    let response = put_auth(
        build_test_app(pool.clone()),
        "/api/v1/users/me",
        &me,
        json!({ "email": "not-an-email" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_auth(
        build_test_app(pool),
        "/api/v1/users/me",
        &me,
        json!({ "first_name": "Ada", "bio": "Builds automations." }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["first_name"], "Ada");
    assert_eq!(json["bio"], "Builds automations.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn payment_account_onboarding_flow(pool: PgPool) {
    let me = token("user_onboarding");

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/users/me/sale-readiness",
        &me,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["is_ready"], false);
    assert_eq!(json["has_payment_account"], false);

    let response = put_auth(
        build_test_app(pool.clone()),
        "/api/v1/users/me/payment-account",
        &me,
        json!({ "stripe_account_id": "acct_123", "onboarding_complete": false }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["has_payment_account"], true);
    assert_eq!(json["is_ready"], false);

    let response = put_auth(
        build_test_app(pool),
        "/api/v1/users/me/payment-account",
        &me,
        json!({ "stripe_account_id": "acct_123", "onboarding_complete": true }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["is_ready"], true);
}
