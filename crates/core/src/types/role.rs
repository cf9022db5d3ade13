//! Client roles used for access decisions.

use serde::{Deserialize, Serialize};

/// The role of an authenticated client.
///
/// Matches the server's wire representation (`ADMIN`, `COMPANY`, `CUSTOMER`).
/// Every protected view names the role it requires; the access gate compares
/// it against the current identity's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access to companies, customers, and all coupons.
    Admin,
    /// Manages the company's own coupons.
    Company,
    /// Browses and purchases coupons.
    Customer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Company => write!(f, "COMPANY"),
            Self::Customer => write!(f, "CUSTOMER"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "COMPANY" => Ok(Self::Company),
            "CUSTOMER" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
