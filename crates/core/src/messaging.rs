//! Rules for direct messages between users.

use crate::error::CoreError;
use crate::validation::{check_text, Violations};

pub const MESSAGE_MAX_CHARS: usize = 2000;

/// Reject a conversation a user would have with themselves.
pub fn ensure_distinct(sender_id: &str, recipient_id: &str) -> Result<(), CoreError> {
    if sender_id == recipient_id {
        return Err(CoreError::invalid(
            "recipient_id",
            "distinct",
            "You cannot message yourself",
        ));
    }
    Ok(())
}

/// Trim a message body and check it holds 1 to 2000 characters.
pub fn validate_body(body: Option<&str>) -> Result<String, CoreError> {
    let mut v = Violations::new();
    let body = check_text(&mut v, "body", body, 1, MESSAGE_MAX_CHARS);
    v.finish(())?;
    body.ok_or_else(|| CoreError::invalid("body", "required", "body is required"))
}
