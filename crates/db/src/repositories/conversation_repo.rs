//! Repository for the `conversations` table.

use koda_core::types::DbId;
use sqlx::PgPool;

use crate::models::conversation::{ordered_pair, Conversation, ConversationSummary};

const COLUMNS: &str =
    "id, participant_a, participant_b, product_id, last_message_at, created_at, updated_at";

/// Provides lookup and creation of two-party conversations.
pub struct ConversationRepo;

impl ConversationRepo {
    /// Return the conversation between two users, creating it if needed.
    ///
    /// There is at most one conversation per pair regardless of argument
    /// order. An existing conversation keeps its product reference unless it
    /// had none.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: &str,
        other_id: &str,
        product_id: Option<DbId>,
    ) -> Result<Conversation, sqlx::Error> {
        let (a, b) = ordered_pair(user_id, other_id);
        let query = format!(
            "INSERT INTO conversations (participant_a, participant_b, product_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (participant_a, participant_b) DO UPDATE
                SET product_id = COALESCE(conversations.product_id, EXCLUDED.product_id)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Conversation>(&query)
            .bind(a)
            .bind(b)
            .bind(product_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Conversation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM conversations WHERE id = $1");
        sqlx::query_as::<_, Conversation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Conversations of `user_id` with their latest message and unread
    /// count, most recently active first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<ConversationSummary>, sqlx::Error> {
        sqlx::query_as::<_, ConversationSummary>(
            "SELECT c.id,
                    CASE WHEN c.participant_a = $1 THEN c.participant_b
                         ELSE c.participant_a END AS counterpart_id,
                    c.product_id,
                    c.last_message_at,
                    lm.body AS last_message,
                    (SELECT COUNT(*) FROM messages m
                      WHERE m.conversation_id = c.id
                        AND m.sender_id <> $1
                        AND NOT m.is_read) AS unread_count,
                    c.created_at
             FROM conversations c
             LEFT JOIN LATERAL (
                SELECT body FROM messages
                WHERE conversation_id = c.id
                ORDER BY created_at DESC, id DESC
                LIMIT 1
             ) lm ON true
             WHERE c.participant_a = $1 OR c.participant_b = $1
             ORDER BY COALESCE(c.last_message_at, c.created_at) DESC, c.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
