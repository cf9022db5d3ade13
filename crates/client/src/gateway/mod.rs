//! The remote gateway contract.
//!
//! The core never talks HTTP directly: it drives a [`Gateway`], which
//! exposes four verbs against named resource endpoints and either returns a
//! structured result or raises a [`GatewayError`] the classifier can
//! interpret. Authentication token attachment is the gateway's
//! responsibility and invisible to the core.

mod http;

pub use http::HttpGateway;

use std::future::Future;

use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use coupon_market_core::{Category, CompanyId, CouponId, CustomerId};

/// A failure raised by a remote call attempt.
///
/// `Status` carries the HTTP status and whatever body shape the server sent;
/// `Transport` covers connection, timeout, and envelope-level failures;
/// `Parse` covers responses the client could not make sense of.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The server answered with a non-success HTTP status.
    #[error("server answered {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Body shape the server attached, if any.
        body: ErrorBody,
    },

    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),

    /// The response arrived but could not be decoded.
    #[error("{0}")]
    Parse(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// The heterogeneous body shapes the remote API attaches to failures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ErrorBody {
    /// No body, or one that could not be read.
    #[default]
    Empty,
    /// A plain string - the server's exact validation message.
    Text(String),
    /// An ordered list of validation messages.
    List(Vec<String>),
    /// Any other JSON value.
    Json(serde_json::Value),
}

/// A confirmation response for create/update/delete operations.
///
/// "Confirmed success" means `success == true`; the mere absence of a
/// transport error confirms nothing.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Confirmation {
    /// Whether the operation succeeded server-side.
    pub success: bool,
    /// User-facing message supplied by the server.
    pub message: String,
    /// Optionally, the created entity (with its server-assigned id).
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

/// Named resource endpoints understood by the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Companies,
    Company(CompanyId),
    Customers,
    Customer(CustomerId),
    Coupons,
    Coupon(CouponId),
    /// Filtered coupon listing; results are presentation-local.
    CouponsByCategory(Category),
    /// Filtered coupon listing; results are presentation-local.
    CouponsByMaxPrice(Decimal),
    /// The current customer's purchased coupons.
    CustomerCoupons,
    /// Purchase endpoint for a single coupon.
    PurchaseCoupon(CouponId),
}

impl Resource {
    /// Path of this resource relative to the API base URL.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Companies => "companies".to_owned(),
            Self::Company(id) => format!("companies/{id}"),
            Self::Customers => "customers".to_owned(),
            Self::Customer(id) => format!("customers/{id}"),
            Self::Coupons => "coupons".to_owned(),
            Self::Coupon(id) => format!("coupons/{id}"),
            Self::CouponsByCategory(category) => format!("coupons/category/{category}"),
            Self::CouponsByMaxPrice(price) => format!("coupons/max-price/{price}"),
            Self::CustomerCoupons => "customer/coupons".to_owned(),
            Self::PurchaseCoupon(id) => format!("customer/purchase-coupon/{id}"),
        }
    }
}

/// Authenticated HTTP verbs against named resource endpoints.
///
/// Implementations must not interpret failures beyond shaping them into
/// [`GatewayError`]; classification belongs to the caller.
pub trait Gateway: Send + Sync {
    /// Fetch the full entity list behind a resource.
    fn list<T>(
        &self,
        resource: Resource,
    ) -> impl Future<Output = Result<Vec<T>, GatewayError>> + Send
    where
        T: DeserializeOwned;

    /// Create an entity (or fire a creation-like endpoint such as purchase).
    fn create<B>(
        &self,
        resource: Resource,
        body: &B,
    ) -> impl Future<Output = Result<Confirmation, GatewayError>> + Send
    where
        B: Serialize + Sync;

    /// Send a full replacement entity.
    fn update<B>(
        &self,
        resource: Resource,
        body: &B,
    ) -> impl Future<Output = Result<Confirmation, GatewayError>> + Send
    where
        B: Serialize + Sync;

    /// Delete the entity behind a resource.
    fn delete(
        &self,
        resource: Resource,
    ) -> impl Future<Output = Result<Confirmation, GatewayError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::Companies.path(), "companies");
        assert_eq!(Resource::Company(CompanyId::new(4)).path(), "companies/4");
        assert_eq!(Resource::CustomerCoupons.path(), "customer/coupons");
        assert_eq!(
            Resource::PurchaseCoupon(CouponId::new(7)).path(),
            "customer/purchase-coupon/7"
        );
        assert_eq!(
            Resource::CouponsByCategory(Category::Food).path(),
            "coupons/category/FOOD"
        );
        assert_eq!(
            Resource::CouponsByMaxPrice(Decimal::new(4990, 2)).path(),
            "coupons/max-price/49.90"
        );
    }

    #[test]
    fn test_confirmation_deserializes_without_payload() {
        let conf: Confirmation =
            serde_json::from_str(r#"{"success": true, "message": "company added successfully"}"#)
                .unwrap();
        assert!(conf.success);
        assert_eq!(conf.message, "company added successfully");
        assert!(conf.payload.is_none());
    }

    #[test]
    fn test_confirmation_carries_payload() {
        let conf: Confirmation = serde_json::from_str(
            r#"{"success": true, "message": "ok", "payload": {"id": 12}}"#,
        )
        .unwrap();
        assert_eq!(conf.payload.unwrap()["id"], 12);
    }
}
