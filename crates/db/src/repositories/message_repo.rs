//! Repository for the `messages` table.

use koda_core::types::DbId;
use sqlx::PgPool;

use crate::models::conversation::Message;

const COLUMNS: &str = "id, conversation_id, sender_id, body, is_read, created_at";

pub struct MessageRepo;

impl MessageRepo {
    /// Append a message and bump the conversation's `last_message_at`.
    pub async fn create(
        pool: &PgPool,
        conversation_id: DbId,
        sender_id: &str,
        body: &str,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "WITH inserted AS (
                INSERT INTO messages (conversation_id, sender_id, body)
                VALUES ($1, $2, $3)
                RETURNING {COLUMNS}
             ), bumped AS (
                UPDATE conversations SET last_message_at = (SELECT created_at FROM inserted)
                WHERE id = $1
             )
             SELECT {COLUMNS} FROM inserted"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .bind(sender_id)
            .bind(body)
            .fetch_one(pool)
            .await
    }

    /// Messages of a conversation, oldest first.
    pub async fn list_for_conversation(
        pool: &PgPool,
        conversation_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE conversation_id = $1
             ORDER BY created_at ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(conversation_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark every message `reader_id` received in the conversation as read.
    /// Returns the number of messages that changed.
    pub async fn mark_read(
        pool: &PgPool,
        conversation_id: DbId,
        reader_id: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = true
             WHERE conversation_id = $1 AND sender_id <> $2 AND NOT is_read",
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Unread messages addressed to `user_id` across all conversations.
    pub async fn unread_count_for_user(pool: &PgPool, user_id: &str) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages m
             JOIN conversations c ON c.id = m.conversation_id
             WHERE (c.participant_a = $1 OR c.participant_b = $1)
               AND m.sender_id <> $1
               AND NOT m.is_read",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
