//! HTTP-level integration tests for the `/listings` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_listing, get, get_auth, listing_body, make_sale_ready,
    money, post_auth, post_payment, put_auth, token,
};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_connected_payment_account(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_auth(
        app,
        "/api/v1/listings",
        &token("user_new_seller"),
        listing_body("Lead Router", 49),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PRECONDITION_FAILED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PRECONDITION_FAILED");
    assert_eq!(json["key"], "errors.payment_account_missing");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_reports_every_invalid_field(pool: PgPool) {
    make_sale_ready(&pool, "user_seller").await;
    let app = build_test_app(pool);

    let response = post_auth(
        app,
        "/api/v1/listings",
        &token("user_seller"),
        json!({
            "description": "short",
            "price": 5000,
            "category": "Gardening",
            "platform": "Zapier",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap())
        .collect();
    for expected in ["title", "description", "price", "category", "file_url"] {
        assert!(fields.contains(&expected), "missing {expected} in {fields:?}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_returns_listing_with_variant_fields(pool: PgPool) {
    make_sale_ready(&pool, "user_seller").await;
    let app = build_test_app(pool);

    let response = post_auth(
        app,
        "/api/v1/listings",
        &token("user_seller"),
        listing_body("  Lead Router  ", 49),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["id"].is_i64());
    assert_eq!(json["title"], "Lead Router");
    assert_eq!(json["seller_id"], "user_seller");
    assert_eq!(json["kind"], "Automation");
    assert_eq!(json["platform"], "Zapier");
    assert_eq!(json["category"], "Sales");
    assert_eq!(money(&json["price"]), Decimal::from(49));
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_unknown_listing_returns_404(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/listings/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["key"], "errors.listing_not_found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_search_and_category(pool: PgPool) {
    create_listing(&pool, "user_seller", "Lead Router", 49).await;
    create_listing(&pool, "user_seller", "Invoice Chaser", 19).await;

    let app = build_test_app(pool.clone());
    let response = get(app, "/api/v1/listings?q=lead&category=Sales").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Lead Router");

    let app = build_test_app(pool);
    let response = get(app, "/api/v1/listings?sort=price_asc").await;
    let json = body_json(response).await;
    let titles: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Invoice Chaser", "Lead Router"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_rejects_unknown_category(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(app, "/api/v1/listings?category=Gardening").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_owner_cannot_update(pool: PgPool) {
    let id = create_listing(&pool, "user_seller", "Lead Router", 49).await;
    let app = build_test_app(pool);

    let response = put_auth(
        app,
        &format!("/api/v1/listings/{id}"),
        &token("user_intruder"),
        json!({ "title": "Stolen" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["key"], "errors.listing_not_owner");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_update_ignores_non_editable_fields(pool: PgPool) {
    let id = create_listing(&pool, "user_seller", "Lead Router", 49).await;
    let app = build_test_app(pool);

    let response = put_auth(
        app,
        &format!("/api/v1/listings/{id}"),
        &token("user_seller"),
        json!({
            "title": "Lead Router Pro",
            "price": 59,
            "seller_id": "user_other",
            "category": "Other",
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["title"], "Lead Router Pro");
    assert_eq!(money(&json["price"]), Decimal::from(59));
    assert_eq!(json["seller_id"], "user_seller");
    assert_eq!(json["category"], "Sales");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_with_invalid_price_returns_400(pool: PgPool) {
    let id = create_listing(&pool, "user_seller", "Lead Router", 49).await;
    let app = build_test_app(pool);

    let response = put_auth(
        app,
        &format!("/api/v1/listings/{id}"),
        &token("user_seller"),
        json!({ "price": 0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["fields"][0]["field"], "price");
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn download_requires_purchase(pool: PgPool) {
    let id = create_listing(&pool, "user_seller", "Lead Router", 49).await;

    let uri = format!("/api/v1/listings/{id}/download");
    let response = get_auth(build_test_app(pool.clone()), &uri, &token("user_buyer")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["key"], "errors.purchase_required");

    let response = get_auth(build_test_app(pool.clone()), &uri, &token("user_seller")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_payment(
        build_test_app(pool.clone()),
        json!({
            "session_id": "sess_dl",
            "buyer_id": "user_buyer",
            "product_id": id,
            "amount": "49.00",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(build_test_app(pool), &uri, &token("user_buyer")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["listing_id"], id);
    assert_eq!(json["file_url"], "https://files.example.com/zap.json");
}
