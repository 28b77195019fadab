//! Payment-completion webhook.
//!
//! The payment processor may deliver the same completion more than once.
//! A replayed session is acknowledged with `already_recorded` instead of an
//! error, so the processor stops retrying. The listing still leaves the
//! buyer's cart on a replay.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use koda_core::error::CoreError;
use koda_core::payment_webhook::{verify_signature, SIGNATURE_HEADER};
use koda_core::types::{DbId, Money};
use koda_db::models::purchase::RecordPurchase;
use koda_db::repositories::{CartRepo, ListingRepo, PurchaseRepo};
use koda_db::DbError;
use koda_events::{PlatformEvent, EVENT_PURCHASE_COMPLETED};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of a payment-completion notification.
#[derive(Debug, Deserialize)]
pub struct PaymentCompleted {
    pub session_id: String,
    pub buyer_id: String,
    pub product_id: DbId,
    /// Gross amount charged.
    pub amount: Money,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_id: Option<DbId>,
}

/// POST /api/v1/webhooks/payments
pub async fn payment_completed(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid payment signature".into()))
        })?;
    let payments = &state.config.payments;
    verify_signature(
        &payments.secret,
        signature,
        &body,
        chrono::Utc::now().timestamp(),
        payments.tolerance_secs,
    )?;

    let event: PaymentCompleted = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid payment notification: {e}")))?;

    let listing = ListingRepo::find_by_id(&state.pool, event.product_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Listing", event.product_id)))?;

    let record = RecordPurchase {
        session_id: event.session_id.clone(),
        buyer_id: event.buyer_id.clone(),
        seller_id: listing.seller_id.clone(),
        product_id: listing.id,
        gross_amount: event.amount,
        category: listing.category,
        platform: listing.platform(),
    };

    let purchase = match PurchaseRepo::record(&state.pool, &record).await {
        Ok(purchase) => purchase,
        Err(DbError::Core(CoreError::DuplicateTransaction { session_id })) => {
            tracing::info!(session_id = %session_id, "Payment session already recorded");
            CartRepo::remove_item(&state.pool, &event.buyer_id, event.product_id).await?;
            let existing = PurchaseRepo::find_by_session(&state.pool, &session_id).await?;
            return Ok(Json(WebhookAck {
                status: "already_recorded",
                purchase_id: existing.map(|p| p.id),
            }));
        }
        Err(e) => return Err(e.into()),
    };

    CartRepo::remove_item(&state.pool, &purchase.buyer_id, purchase.product_id).await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_PURCHASE_COMPLETED)
            .with_source("purchase", purchase.id)
            .with_actor(purchase.buyer_id.clone())
            .with_recipient(purchase.seller_id.clone())
            .with_payload(serde_json::json!({
                "product_id": purchase.product_id,
                "amount": purchase.amount,
                "net_amount": purchase.net_amount,
            })),
    );

    Ok(Json(WebhookAck {
        status: "recorded",
        purchase_id: Some(purchase.id),
    }))
}
