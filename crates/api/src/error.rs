use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use koda_core::error::CoreError;
use koda_core::error_keys;
use koda_db::DbError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{ "error", "code", "key" }`, plus `"fields"` for validation
/// failures.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `koda_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<DbError> for AppError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Core(core) => AppError::Core(core),
            DbError::Sqlx(sqlx) => AppError::Database(sqlx),
        }
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut fields = None;
        let mut key_hint = None;
        let (status, code, message, default_key) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => {
                let status = match core {
                    CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                    CoreError::DuplicateTransaction { .. } => StatusCode::CONFLICT,
                    CoreError::Precondition(_) => StatusCode::PRECONDITION_FAILED,
                    CoreError::Conflict(_) => StatusCode::CONFLICT,
                    CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
                    CoreError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = match core {
                    CoreError::NotFound { entity, id } => format!("{entity} with id {id} not found"),
                    CoreError::Validation(failure) => {
                        fields = Some(failure.violations.clone());
                        key_hint = failure.violations.first().map(|v| v.message.clone());
                        failure.to_string()
                    }
                    CoreError::DuplicateTransaction { .. } => core.to_string(),
                    CoreError::Precondition(msg)
                    | CoreError::Conflict(msg)
                    | CoreError::Unauthorized(msg)
                    | CoreError::Forbidden(msg) => msg.clone(),
                    CoreError::Internal(msg) => {
                        tracing::error!(error = %msg, "Internal core error");
                        INTERNAL_MESSAGE.to_string()
                    }
                };
                (status, core.code(), message, core.key())
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                msg.clone(),
                "errors.bad_request",
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                    error_keys::FALLBACK_KEY,
                )
            }
        };

        let key = error_keys::resolve_key(key_hint.as_deref().unwrap_or(&message), default_key);
        let mut body = json!({
            "error": message,
            "code": code,
            "key": key,
        });
        if let Some(fields) = fields {
            body["fields"] = json!(fields);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, message and
/// default translation key.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String, &'static str) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            "errors.not_found",
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        "errors.conflict",
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
                error_keys::FALLBACK_KEY,
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
                error_keys::FALLBACK_KEY,
            )
        }
    }
}
