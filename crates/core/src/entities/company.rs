//! Company entity.

use serde::{Deserialize, Serialize};

use crate::entities::Coupon;
use crate::types::{CompanyId, Email};

/// A company that issues coupons.
///
/// Updates send the full entity; the server responds with a confirmation and
/// the client replaces its snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub email: Email,
    pub password: String,
    /// Coupons issued by this company, when the server includes them.
    #[serde(default)]
    pub coupons: Vec<Coupon>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_without_coupons() {
        let json = r#"{
            "id": 3,
            "name": "Acme",
            "email": "office@acme.example",
            "password": "hunter2"
        }"#;

        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.id, CompanyId::new(3));
        assert_eq!(company.name, "Acme");
        assert!(company.coupons.is_empty());
    }
}
