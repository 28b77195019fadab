//! Handlers for the `/conversations` resource.
//!
//! Only the two participants can read or write a conversation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use koda_core::error::CoreError;
use koda_core::messaging::{ensure_distinct, validate_body};
use koda_core::types::DbId;
use koda_db::models::conversation::{Conversation, ConversationSummary, Message};
use koda_db::repositories::{ConversationRepo, ListingRepo, MessageRepo, UserRepo};
use koda_events::{PlatformEvent, EVENT_MESSAGE_CREATED};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentUser;
use crate::query::PaginationParams;
use crate::response::{CountResponse, DataResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /conversations`.
#[derive(Debug, Deserialize)]
pub struct StartConversationRequest {
    /// External id of the other participant.
    pub recipient_id: String,
    /// Listing the conversation is about, if any.
    pub product_id: Option<DbId>,
}

/// Request body for `POST /conversations/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub body: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub conversation_id: DbId,
    pub marked_read: u64,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a conversation the user takes part in.
async fn participant_conversation(
    state: &AppState,
    id: DbId,
    user_id: &str,
) -> AppResult<Conversation> {
    let conversation = ConversationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Conversation", id)))?;
    if !conversation.has_participant(user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a participant in this conversation".into(),
        )));
    }
    Ok(conversation)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/conversations
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<DataResponse<Vec<ConversationSummary>>>> {
    let conversations = ConversationRepo::list_for_user(&state.pool, &user.clerk_id).await?;
    Ok(Json(DataResponse {
        data: conversations,
    }))
}

/// POST /api/v1/conversations
///
/// Returns the existing conversation with the recipient if there is one.
pub async fn start(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<StartConversationRequest>,
) -> AppResult<Json<Conversation>> {
    let recipient_id = input.recipient_id.trim();
    ensure_distinct(&user.clerk_id, recipient_id)?;

    if UserRepo::find_by_clerk_id(&state.pool, recipient_id).await?.is_none() {
        return Err(AppError::Core(CoreError::not_found("User", recipient_id)));
    }
    if let Some(product_id) = input.product_id {
        if ListingRepo::find_by_id(&state.pool, product_id).await?.is_none() {
            return Err(AppError::Core(CoreError::not_found("Listing", product_id)));
        }
    }

    let conversation =
        ConversationRepo::get_or_create(&state.pool, &user.clerk_id, recipient_id, input.product_id)
            .await?;
    Ok(Json(conversation))
}

/// GET /api/v1/conversations/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<CountResponse>> {
    let count = MessageRepo::unread_count_for_user(&state.pool, &user.clerk_id).await?;
    Ok(Json(CountResponse { count }))
}

/// GET /api/v1/conversations/{id}/messages
pub async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    participant_conversation(&state, id, &user.clerk_id).await?;
    let messages =
        MessageRepo::list_for_conversation(&state.pool, id, page.limit(), page.offset()).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/conversations/{id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<Message>)> {
    let conversation = participant_conversation(&state, id, &user.clerk_id).await?;
    let body = validate_body(input.body.as_deref())?;

    let message = MessageRepo::create(&state.pool, id, &user.clerk_id, &body).await?;

    state.event_bus.publish(
        PlatformEvent::new(EVENT_MESSAGE_CREATED)
            .with_source("message", message.id)
            .with_actor(user.clerk_id.clone())
            .with_recipient(conversation.counterpart_of(&user.clerk_id))
            .with_payload(serde_json::json!({ "conversation_id": id })),
    );

    Ok((StatusCode::CREATED, Json(message)))
}

/// POST /api/v1/conversations/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MarkReadResponse>> {
    participant_conversation(&state, id, &user.clerk_id).await?;
    let marked_read = MessageRepo::mark_read(&state.pool, id, &user.clerk_id).await?;
    Ok(Json(MarkReadResponse {
        conversation_id: id,
        marked_read,
    }))
}
