//! Server-backed entity snapshots.
//!
//! Each entity mirrors the remote API's JSON shape exactly. Entities are
//! plain data: the client replaces them wholesale on load or confirmed
//! mutation and never merges fields.

pub mod company;
pub mod coupon;
pub mod customer;

pub use company::Company;
pub use coupon::{Coupon, CouponError};
pub use customer::Customer;
