//! Commission split between seller payout and platform fee.
//!
//! The seller receives 85% of the gross amount rounded to the cent; the
//! platform fee is whatever remains, so `net + fee == gross` holds exactly.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::CoreError;
use crate::types::Money;

/// Seller share of every sale (85%).
pub fn seller_rate() -> Decimal {
    Decimal::new(85, 2)
}

/// Largest gross amount the ledger can store (`NUMERIC(10, 2)`).
pub fn gross_max() -> Money {
    Decimal::new(99_999_999_99, 2)
}

/// Result of splitting one gross sale amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CommissionSplit {
    pub gross: Money,
    pub net: Money,
    pub platform_fee: Money,
}

/// Split `gross` into seller payout and platform fee.
///
/// Fails with a validation error when `gross` is not positive, exceeds
/// [`gross_max`], or carries sub-cent precision.
pub fn split(gross: Money) -> Result<CommissionSplit, CoreError> {
    if gross <= Decimal::ZERO {
        return Err(CoreError::invalid(
            "amount",
            "positive",
            "amount must be greater than zero",
        ));
    }
    if gross > gross_max() {
        return Err(CoreError::invalid(
            "amount",
            "range",
            format!("amount must be at most {}", gross_max()),
        ));
    }
    let gross = gross.normalize();
    if gross.scale() > 2 {
        return Err(CoreError::invalid(
            "amount",
            "scale",
            "amount must have at most 2 decimal places",
        ));
    }

    let net = (gross * seller_rate())
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let platform_fee = gross - net;

    Ok(CommissionSplit {
        gross,
        net,
        platform_fee,
    })
}
