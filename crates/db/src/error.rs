use koda_core::error::CoreError;

/// Error for repository operations that can fail for domain reasons as well
/// as database ones (duplicate ledger sessions, ownership checks).
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}
