//! Lazily initialized shared handles.

use std::fmt::Display;
use std::future::Future;

use tokio::sync::OnceCell;

/// A value built on first use and then shared.
///
/// Callers racing on an empty handle converge on one initialization attempt.
/// A failed attempt leaves the handle empty, so a later call retries instead
/// of seeing a permanently cached failure.
#[derive(Debug)]
pub struct LazyHandle<T> {
    cell: OnceCell<T>,
}

impl<T> LazyHandle<T> {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
        }
    }

    /// Return the shared value, running `connect` if no value exists yet.
    pub async fn get_or_connect<F, Fut, E>(&self, connect: F) -> Result<&T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.cell
            .get_or_try_init(move || async move {
                tracing::debug!("Initializing shared handle");
                let result = connect().await;
                if let Err(e) = &result {
                    tracing::warn!(error = %e, "Shared handle initialization failed, will retry on next use");
                }
                result
            })
            .await
    }

    /// The value if it has been initialized.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }
}

impl<T> Default for LazyHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}
