//! Client state synchronization and access-control core.
//!
//! # Architecture
//!
//! - [`store`] - process-wide cache of server entities and the current
//!   identity; reads are cloned snapshots, writes are whole-value
//!   replacements applied only after the server confirms an operation
//! - [`gateway`] - the remote API contract (`Gateway` trait) and its
//!   `reqwest`-backed implementation; owns token attachment
//! - [`client`] - [`CouponClient`], the fetch orchestrator and mutation
//!   pipeline driving the store through the gateway
//! - [`access`] - the role gate every protected view consults before
//!   rendering or fetching
//! - [`error`] - classification of heterogeneous remote failures into a
//!   fixed taxonomy
//! - [`notify`] - the broadcast side channel carrying exactly one
//!   user-visible message per completed operation
//!
//! # Example
//!
//! ```rust,ignore
//! use coupon_market_client::{ClientConfig, CouponClient, HttpGateway, EntityStore};
//! use coupon_market_client::store::CollectionKind;
//!
//! let config = ClientConfig::from_env()?;
//! let store = EntityStore::new();
//! let gateway = HttpGateway::new(&config, store.clone())?;
//! let client = CouponClient::new(store, gateway);
//!
//! client.sign_in(identity);
//! client.ensure_loaded(CollectionKind::Coupons).await;
//! let coupons = client.store().coupons();
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod access;
pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod notify;
pub mod store;

pub use access::AccessDecision;
pub use client::{CouponClient, CouponFilter};
pub use config::{ClientConfig, ConfigError};
pub use error::ErrorKind;
pub use gateway::{Confirmation, ErrorBody, Gateway, GatewayError, HttpGateway, Resource};
pub use notify::{Notification, Notifier, Severity};
pub use store::{CollectionKind, EntityStore};
