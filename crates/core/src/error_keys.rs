//! Error message to translation-key lookup.
//!
//! Presentation layers localize errors by key instead of matching raw error
//! text. Lookup tries an exact match against known messages, then a
//! case-insensitive substring match against known patterns, and finally
//! falls back to a default key.

/// Key used when nothing else matches.
pub const FALLBACK_KEY: &str = "errors.generic";

/// Known messages, matched exactly.
const EXACT: &[(&str, &str)] = &[
    ("Missing Authorization header", "errors.auth.missing_token"),
    ("Invalid or expired token", "errors.auth.invalid_token"),
    ("Your account has been banned", "errors.user_banned"),
    ("Admin role required", "errors.admin_required"),
    ("Payment account is not connected", "errors.payment_account_missing"),
    ("Payment onboarding is not complete", "errors.payment_onboarding_incomplete"),
    ("You can only edit your own listings", "errors.listing_not_owner"),
    ("Purchase required to download", "errors.purchase_required"),
    ("You cannot message yourself", "errors.message_self"),
    ("Not a participant in this conversation", "errors.conversation_forbidden"),
    ("Invalid payment signature", "errors.payment_signature"),
];

/// Known fragments, matched case-insensitively anywhere in the message.
/// Earlier entries win.
const PATTERNS: &[(&str, &str)] = &[
    ("already been recorded", "errors.duplicate_transaction"),
    ("banned", "errors.user_banned"),
    ("onboarding", "errors.payment_onboarding_incomplete"),
    ("payment account", "errors.payment_account_missing"),
    ("listing with id", "errors.listing_not_found"),
    ("user with id", "errors.user_not_found"),
    ("conversation with id", "errors.conversation_not_found"),
    ("not found", "errors.not_found"),
    ("unique constraint", "errors.conflict"),
    ("required", "errors.validation"),
    ("must be", "errors.validation"),
    ("token", "errors.unauthorized"),
    ("forbidden", "errors.forbidden"),
    ("timed out", "errors.timeout"),
];

/// Resolve a translation key for `message`, using [`FALLBACK_KEY`] when
/// nothing matches.
pub fn translation_key(message: &str) -> &'static str {
    resolve_key(message, FALLBACK_KEY)
}

/// Resolve a translation key for `message`, using `default` when nothing
/// matches.
pub fn resolve_key(message: &str, default: &'static str) -> &'static str {
    if let Some((_, key)) = EXACT.iter().find(|(m, _)| *m == message) {
        return key;
    }
    let lower = message.to_lowercase();
    PATTERNS
        .iter()
        .find(|(pattern, _)| lower.contains(pattern))
        .map(|(_, key)| *key)
        .unwrap_or(default)
}
