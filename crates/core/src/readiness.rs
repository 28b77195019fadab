//! Seller sale-readiness.
//!
//! A user may sell only once a payment account is linked and the payment
//! processor reports onboarding complete.

use serde::Serialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaleReadiness {
    pub has_payment_account: bool,
    pub onboarding_complete: bool,
    pub is_ready: bool,
}

impl SaleReadiness {
    pub fn evaluate(payment_account_id: Option<&str>, onboarding_complete: bool) -> Self {
        let has_payment_account = payment_account_id.is_some_and(|id| !id.trim().is_empty());
        Self {
            has_payment_account,
            onboarding_complete,
            is_ready: has_payment_account && onboarding_complete,
        }
    }

    /// Fail with [`CoreError::Precondition`] unless the user can sell.
    pub fn ensure_ready(&self) -> Result<(), CoreError> {
        if self.is_ready {
            return Ok(());
        }
        let reason = if !self.has_payment_account {
            "Payment account is not connected"
        } else {
            "Payment onboarding is not complete"
        };
        Err(CoreError::Precondition(reason.into()))
    }
}
