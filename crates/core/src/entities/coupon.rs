//! Coupon entity.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Category, CompanyId, CouponId};

/// Errors that make a coupon invalid before it ever reaches the server.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CouponError {
    /// The validity window ends before it starts.
    #[error("coupon end date must not precede its start date")]
    InvalidWindow,
    /// The price is negative.
    #[error("coupon price cannot be negative")]
    NegativePrice,
}

/// A coupon offered by a company.
///
/// Dates are timezone-qualified; `image` is an opaque reference into the
/// avatar service, resolved by the view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: CouponId,
    pub company_id: CompanyId,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Remaining stock.
    pub amount: u32,
    pub price: Decimal,
    pub image: Uuid,
}

impl Coupon {
    /// Check the invariants the server enforces on its side as well:
    /// `start_date <= end_date` and a non-negative price.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), CouponError> {
        if self.end_date < self.start_date {
            return Err(CouponError::InvalidWindow);
        }
        if self.price.is_sign_negative() {
            return Err(CouponError::NegativePrice);
        }
        Ok(())
    }

    /// Two-decimal price string for card display, e.g. `"49.90$"`.
    #[must_use]
    pub fn display_price(&self) -> String {
        format!("{:.2}$", self.price)
    }
}
