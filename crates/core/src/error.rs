use crate::validation::ValidationFailure;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationFailure),

    #[error("Payment session {session_id} has already been recorded")]
    DuplicateTransaction { session_id: String },

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a validation error on a single field.
    pub fn invalid(field: &str, rule: &'static str, message: impl Into<String>) -> Self {
        CoreError::Validation(ValidationFailure::single(field, rule, message))
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "NOT_FOUND",
            CoreError::Validation(_) => "VALIDATION_ERROR",
            CoreError::DuplicateTransaction { .. } => "DUPLICATE_TRANSACTION",
            CoreError::Precondition(_) => "PRECONDITION_FAILED",
            CoreError::Conflict(_) => "CONFLICT",
            CoreError::Unauthorized(_) => "UNAUTHORIZED",
            CoreError::Forbidden(_) => "FORBIDDEN",
            CoreError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Default translation key for this error kind.
    ///
    /// Presentation layers refine it through
    /// [`error_keys::resolve_key`](crate::error_keys::resolve_key).
    pub fn key(&self) -> &'static str {
        match self {
            CoreError::NotFound { .. } => "errors.not_found",
            CoreError::Validation(_) => "errors.validation",
            CoreError::DuplicateTransaction { .. } => "errors.duplicate_transaction",
            CoreError::Precondition(_) => "errors.precondition",
            CoreError::Conflict(_) => "errors.conflict",
            CoreError::Unauthorized(_) => "errors.unauthorized",
            CoreError::Forbidden(_) => "errors.forbidden",
            CoreError::Internal(_) => crate::error_keys::FALLBACK_KEY,
        }
    }
}
