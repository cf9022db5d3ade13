//! Customer entity.

use serde::{Deserialize, Serialize};

use crate::entities::Coupon;
use crate::types::{CustomerId, Email};

/// A customer who purchases coupons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub password: String,
    /// Coupons this customer has purchased, when the server includes them.
    #[serde(default)]
    pub coupons: Vec<Coupon>,
}
