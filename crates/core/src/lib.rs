//! Coupon Market Core - Shared types library.
//!
//! This crate provides the common types shared by the client core (state
//! synchronization and access control) and the view layer that reads entity
//! snapshots from it.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, roles, and
//!   coupon categories
//! - [`entities`] - Server-backed entity snapshots (companies, customers,
//!   coupons)
//! - [`identity`] - The authenticated identity held while a user is signed in

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod entities;
pub mod identity;
pub mod types;

pub use entities::*;
pub use identity::Identity;
pub use types::*;
