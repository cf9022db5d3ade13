//! Coupon categories.

use serde::{Deserialize, Serialize};

/// The category a coupon is filed under.
///
/// Matches the server's wire representation (`FOOD`, `ELECTRICITY`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Food,
    Electricity,
    Restaurant,
    Vacation,
    Fashion,
    Spa,
}

impl Category {
    /// Lower-cased label with a capitalized first letter, for card display.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Electricity => "Electricity",
            Self::Restaurant => "Restaurant",
            Self::Vacation => "Vacation",
            Self::Fashion => "Fashion",
            Self::Spa => "Spa",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Food => write!(f, "FOOD"),
            Self::Electricity => write!(f, "ELECTRICITY"),
            Self::Restaurant => write!(f, "RESTAURANT"),
            Self::Vacation => write!(f, "VACATION"),
            Self::Fashion => write!(f, "FASHION"),
            Self::Spa => write!(f, "SPA"),
        }
    }
}
