//! Integration tests for user provisioning and administration.

use koda_core::catalog::{validate_listing_input, ListingInput};
use koda_core::roles::{ROLE_ADMIN, ROLE_USER};
use koda_db::models::purchase::RecordPurchase;
use koda_core::profile::ProfileUpdate;
use koda_db::models::user::{ProvisionUser, UpdatePaymentAccount};
use koda_db::repositories::{
    ConversationRepo, ListingRepo, MessageRepo, PurchaseRepo, UserRepo,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

fn provision(clerk_id: &str, role: &str) -> ProvisionUser {
    ProvisionUser {
        clerk_id: clerk_id.to_string(),
        email: Some(format!("{clerk_id}@example.com")),
        role: role.to_string(),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ensure_exists_is_idempotent(pool: PgPool) {
    let first = UserRepo::ensure_exists(&pool, &provision("user_1", ROLE_USER)).await.unwrap();
    let second = UserRepo::ensure_exists(&pool, &provision("user_1", ROLE_ADMIN)).await.unwrap();

    assert_eq!(first.id, second.id);
    // Stored role wins over later claims.
    assert_eq!(second.role, ROLE_USER);
    assert!(second.cart.is_empty());
    assert!(!second.is_banned);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_provisioning_converges(pool: PgPool) {
    let input = provision("user_1", ROLE_USER);
    let (a, b) = tokio::join!(
        UserRepo::ensure_exists(&pool, &input),
        UserRepo::ensure_exists(&pool, &input),
    );
    assert_eq!(a.unwrap().id, b.unwrap().id);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile_keeps_absent_fields(pool: PgPool) {
    UserRepo::ensure_exists(&pool, &provision("user_1", ROLE_USER)).await.unwrap();

    let updated = UserRepo::update_profile(
        &pool,
        "user_1",
        &ProfileUpdate {
            first_name: Some("Ada".into()),
            bio: Some("Builds automations".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.first_name.as_deref(), Some("Ada"));
    assert_eq!(updated.email.as_deref(), Some("user_1@example.com"));

    let missing = UserRepo::update_profile(&pool, "ghost", &ProfileUpdate::default())
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payment_account_drives_sale_readiness(pool: PgPool) {
    let user = UserRepo::ensure_exists(&pool, &provision("seller_1", ROLE_USER)).await.unwrap();
    assert!(!user.sale_readiness().is_ready);

    let linked = UserRepo::update_payment_account(
        &pool,
        "seller_1",
        &UpdatePaymentAccount {
            stripe_account_id: "acct_123".into(),
            onboarding_complete: false,
        },
    )
    .await
    .unwrap()
    .unwrap();
    let readiness = linked.sale_readiness();
    assert!(readiness.has_payment_account);
    assert!(!readiness.is_ready);

    let ready = UserRepo::update_payment_account(
        &pool,
        "seller_1",
        &UpdatePaymentAccount {
            stripe_account_id: "acct_123".into(),
            onboarding_complete: true,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(ready.sale_readiness().is_ready);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ban_and_role_changes(pool: PgPool) {
    let user = UserRepo::ensure_exists(&pool, &provision("user_1", ROLE_USER)).await.unwrap();

    let banned = UserRepo::set_banned(&pool, user.id, true).await.unwrap().unwrap();
    assert!(banned.is_banned);

    let promoted = UserRepo::set_role(&pool, user.id, ROLE_ADMIN).await.unwrap().unwrap();
    assert!(promoted.is_admin());

    assert!(UserRepo::set_banned(&pool, 999_999, true).await.unwrap().is_none());
    assert!(UserRepo::set_role(&pool, user.id, "superuser").await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_users_in_creation_order(pool: PgPool) {
    for id in ["u1", "u2", "u3"] {
        UserRepo::ensure_exists(&pool, &provision(id, ROLE_USER)).await.unwrap();
    }
    let page = UserRepo::list(&pool, 2, 1).await.unwrap();
    let ids: Vec<&str> = page.iter().map(|u| u.clerk_id.as_str()).collect();
    assert_eq!(ids, vec!["u2", "u3"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_cascade_keeps_ledger(pool: PgPool) {
    let seller = UserRepo::ensure_exists(&pool, &provision("seller_1", ROLE_USER)).await.unwrap();
    UserRepo::ensure_exists(&pool, &provision("buyer_1", ROLE_USER)).await.unwrap();

    let input = ListingInput {
        title: Some("Lead Sync".into()),
        description: Some("Syncs leads between your CRM and inbox.".into()),
        price: Some(Decimal::from(25)),
        category: Some("Sales".into()),
        platform: Some("Python".into()),
        file_url: Some("https://files.example.com/sync.py".into()),
        ..Default::default()
    };
    let listing = ListingRepo::create(&pool, &validate_listing_input("seller_1", &input).unwrap())
        .await
        .unwrap();

    let conversation = ConversationRepo::get_or_create(&pool, "buyer_1", "seller_1", Some(listing.id))
        .await
        .unwrap();
    MessageRepo::create(&pool, conversation.id, "buyer_1", "Hi!").await.unwrap();

    PurchaseRepo::record(
        &pool,
        &RecordPurchase {
            session_id: "sess_1".into(),
            buyer_id: "buyer_1".into(),
            seller_id: "seller_1".into(),
            product_id: listing.id,
            gross_amount: Decimal::from(25),
            category: listing.category,
            platform: listing.platform(),
        },
    )
    .await
    .unwrap();

    let deletion = UserRepo::delete_cascade(&pool, seller.id).await.unwrap().unwrap();
    assert_eq!(deletion.clerk_id, "seller_1");
    assert_eq!(deletion.listings_deleted, 1);
    assert_eq!(deletion.conversations_deleted, 1);

    assert!(UserRepo::find_by_id(&pool, seller.id).await.unwrap().is_none());
    assert!(ListingRepo::find_by_id(&pool, listing.id).await.unwrap().is_none());
    assert!(ConversationRepo::find_by_id(&pool, conversation.id).await.unwrap().is_none());
    let messages: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(messages, 0);
    assert!(PurchaseRepo::has_purchased(&pool, "buyer_1", listing.id).await.unwrap());

    assert!(UserRepo::delete_cascade(&pool, seller.id).await.unwrap().is_none());
}
