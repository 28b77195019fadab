//! Conversation and message models.

use koda_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `conversations` table.
///
/// `participant_a < participant_b` always holds; use
/// [`ordered_pair`] to build the pair.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Conversation {
    pub id: DbId,
    pub participant_a: String,
    pub participant_b: String,
    pub product_id: Option<DbId>,
    pub last_message_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Conversation {
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.participant_a == user_id || self.participant_b == user_id
    }

    /// The participant that is not `user_id`.
    pub fn counterpart_of(&self, user_id: &str) -> &str {
        if self.participant_a == user_id {
            &self.participant_b
        } else {
            &self.participant_a
        }
    }
}

/// A conversation as listed for one participant.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationSummary {
    pub id: DbId,
    pub counterpart_id: String,
    pub product_id: Option<DbId>,
    pub last_message_at: Option<Timestamp>,
    pub last_message: Option<String>,
    pub unread_count: i64,
    pub created_at: Timestamp,
}

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub conversation_id: DbId,
    pub sender_id: String,
    pub body: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// Sort two participant ids into storage order.
pub fn ordered_pair<'a>(x: &'a str, y: &'a str) -> (&'a str, &'a str) {
    if x <= y {
        (x, y)
    } else {
        (y, x)
    }
}
