//! The coupon marketplace client: fetch orchestration and the mutation
//! pipeline.
//!
//! [`CouponClient`] is the single code path that writes to the entity store.
//! Collection loads replace a whole collection; mutations patch a single
//! entry - and only after the gateway confirms the operation server-side.
//! Nothing is written speculatively, so no rollback machinery exists; the
//! cost is a perceptible delay between action and UI update, favoring
//! consistency over responsiveness.
//!
//! Every operation resolves with `()`. Outcomes travel exclusively on the
//! notification side channel.

use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use coupon_market_core::{
    Category, Company, CompanyId, Coupon, CouponId, Customer, CustomerId, Identity, Role,
};

use crate::access::{self, AccessDecision};
use crate::error::{ErrorKind, classify};
use crate::gateway::{Confirmation, Gateway, GatewayError, Resource};
use crate::notify::{Notifier, messages};
use crate::store::{CollectionKind, EntityStore};

/// Parameters for a presentation-local coupon fetch.
///
/// Filtered results are never written back to the canonical store; the view
/// that asked for them owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CouponFilter {
    /// Coupons in one category.
    Category(Category),
    /// Coupons priced at or below a ceiling.
    MaxPrice(Decimal),
}

impl CouponFilter {
    const fn resource(self) -> Resource {
        match self {
            Self::Category(category) => Resource::CouponsByCategory(category),
            Self::MaxPrice(price) => Resource::CouponsByMaxPrice(price),
        }
    }
}

/// One guard per collection: at most one "load all" request in flight.
#[derive(Default)]
struct Inflight {
    companies: Mutex<()>,
    customers: Mutex<()>,
    coupons: Mutex<()>,
    customer_coupons: Mutex<()>,
}

impl Inflight {
    const fn guard(&self, kind: CollectionKind) -> &Mutex<()> {
        match kind {
            CollectionKind::Companies => &self.companies,
            CollectionKind::Customers => &self.customers,
            CollectionKind::Coupons => &self.coupons,
            CollectionKind::CustomerCoupons => &self.customer_coupons,
        }
    }
}

/// Client core driving the entity store through a remote gateway.
///
/// Cheaply cloneable; all clones share the store, the notifier, and the
/// in-flight guards.
#[derive(Clone)]
pub struct CouponClient<G> {
    store: EntityStore,
    gateway: G,
    notifier: Notifier,
    inflight: Arc<Inflight>,
}

impl<G: Gateway> CouponClient<G> {
    /// Create a client around an existing store and gateway.
    pub fn new(store: EntityStore, gateway: G) -> Self {
        Self {
            store,
            gateway,
            notifier: Notifier::new(),
            inflight: Arc::new(Inflight::default()),
        }
    }

    /// The shared entity store. Views read snapshots from here.
    #[must_use]
    pub const fn store(&self) -> &EntityStore {
        &self.store
    }

    /// The notification side channel.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    // =========================================================================
    // Identity & access
    // =========================================================================

    /// Install the identity established by a successful sign-in.
    pub fn sign_in(&self, identity: Identity) {
        self.store.set_identity(identity);
    }

    /// Clear the identity and every cached collection.
    ///
    /// Collections go too: cached data from one identity must never serve
    /// the next.
    pub fn sign_out(&self) {
        self.store.clear_all();
    }

    /// Gate decision for a view requiring `required` (or any signed-in
    /// identity when `None`). Re-evaluate on every view mount.
    #[must_use]
    pub fn check_access(&self, required: Option<Role>) -> AccessDecision {
        access::check_access(&self.store, required)
    }

    // =========================================================================
    // Fetch orchestration
    // =========================================================================

    /// Load a collection from the server unless it already has entries.
    ///
    /// Idempotent: a non-empty collection is served from cache, and
    /// concurrent calls for the same collection while a request is
    /// outstanding wait instead of issuing duplicates. On success the whole
    /// collection is replaced; on failure the store is untouched and the
    /// classified message is surfaced.
    pub async fn ensure_loaded(&self, kind: CollectionKind) {
        if !self.store.is_empty(kind) {
            debug!(?kind, "collection already loaded");
            return;
        }

        let _held = self.inflight.guard(kind).lock().await;
        if !self.store.is_empty(kind) {
            // A concurrent load finished while we waited for the guard.
            return;
        }

        match kind {
            CollectionKind::Companies => self.load_companies().await,
            CollectionKind::Customers => self.load_customers().await,
            CollectionKind::Coupons => self.load_coupons().await,
            CollectionKind::CustomerCoupons => self.load_customer_coupons().await,
        }
    }

    async fn load_companies(&self) {
        match self.gateway.list::<Company>(Resource::Companies).await {
            Ok(companies) => {
                self.store.replace_companies(companies);
                self.notifier.success(messages::ALL_COMPANIES);
            }
            Err(err) => self.report_fetch_failure(&err),
        }
    }

    async fn load_customers(&self) {
        match self.gateway.list::<Customer>(Resource::Customers).await {
            Ok(customers) => {
                self.store.replace_customers(customers);
                self.notifier.success(messages::ALL_CUSTOMERS);
            }
            Err(err) => self.report_fetch_failure(&err),
        }
    }

    async fn load_coupons(&self) {
        match self.gateway.list::<Coupon>(Resource::Coupons).await {
            Ok(coupons) => {
                self.store.replace_coupons(coupons);
                self.notifier.success(messages::ALL_COUPONS);
            }
            Err(err) => self.report_fetch_failure(&err),
        }
    }

    async fn load_customer_coupons(&self) {
        match self.gateway.list::<Coupon>(Resource::CustomerCoupons).await {
            Ok(coupons) => {
                self.store.replace_customer_coupons(coupons);
                self.notifier.success(messages::ALL_CUSTOMER_COUPONS);
            }
            Err(err) => self.report_fetch_failure(&err),
        }
    }

    /// Fetch coupons matching a filter, bypassing the cache.
    ///
    /// Always issues a fresh request; the canonical coupons collection is
    /// left as-is. An empty match emits "no coupons from this filter"; a
    /// failure emits the classified message. Either way the caller gets the
    /// list it should display.
    pub async fn filtered_coupons(&self, filter: CouponFilter) -> Vec<Coupon> {
        match self.gateway.list::<Coupon>(filter.resource()).await {
            Ok(coupons) if coupons.is_empty() => {
                self.notifier.error(messages::NO_FILTER_MATCHES);
                coupons
            }
            Ok(coupons) => coupons,
            Err(err) => {
                self.report_fetch_failure(&err);
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Mutation pipeline - companies
    // =========================================================================

    /// Create a company. Applied to the store only on confirmed success.
    pub async fn add_company(&self, company: Company) {
        match self.gateway.create(Resource::Companies, &company).await {
            Ok(conf) if conf.success => {
                let created = entity_from_payload(&conf).unwrap_or(company);
                self.store.upsert_company(created);
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    /// Send a full replacement company; the store entry is replaced
    /// wholesale on confirmed success.
    pub async fn update_company(&self, company: Company) {
        match self.gateway.update(Resource::Companies, &company).await {
            Ok(conf) if conf.success => {
                self.store.upsert_company(company);
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    /// Delete a company by id. The entry is removed only on confirmed
    /// success; the server confirming a delete of an absent id is still a
    /// success, not an error.
    pub async fn delete_company(&self, id: CompanyId) {
        match self.gateway.delete(Resource::Company(id)).await {
            Ok(conf) if conf.success => {
                self.store.remove_company(id);
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    // =========================================================================
    // Mutation pipeline - customers
    // =========================================================================

    /// Create a customer. Applied to the store only on confirmed success.
    pub async fn add_customer(&self, customer: Customer) {
        match self.gateway.create(Resource::Customers, &customer).await {
            Ok(conf) if conf.success => {
                let created = entity_from_payload(&conf).unwrap_or(customer);
                self.store.upsert_customer(created);
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    /// Send a full replacement customer.
    pub async fn update_customer(&self, customer: Customer) {
        match self.gateway.update(Resource::Customers, &customer).await {
            Ok(conf) if conf.success => {
                self.store.upsert_customer(customer);
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    /// Delete a customer by id.
    pub async fn delete_customer(&self, id: CustomerId) {
        match self.gateway.delete(Resource::Customer(id)).await {
            Ok(conf) if conf.success => {
                self.store.remove_customer(id);
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    // =========================================================================
    // Mutation pipeline - coupons
    // =========================================================================

    /// Create a coupon. Applied to the store only on confirmed success.
    pub async fn add_coupon(&self, coupon: Coupon) {
        match self.gateway.create(Resource::Coupons, &coupon).await {
            Ok(conf) if conf.success => {
                let created = entity_from_payload(&conf).unwrap_or(coupon);
                self.store.upsert_coupon(created);
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    /// Send a full replacement coupon.
    pub async fn update_coupon(&self, coupon: Coupon) {
        match self.gateway.update(Resource::Coupons, &coupon).await {
            Ok(conf) if conf.success => {
                self.store.upsert_coupon(coupon);
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    /// Delete a coupon by id (also drops the purchased copy, if any).
    pub async fn delete_coupon(&self, id: CouponId) {
        match self.gateway.delete(Resource::Coupon(id)).await {
            Ok(conf) if conf.success => {
                self.store.remove_coupon(id);
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    // =========================================================================
    // Mutation pipeline - purchase
    // =========================================================================

    /// Purchase a coupon for the current customer.
    ///
    /// On confirmed success the coupon is copied from the canonical coupons
    /// collection into the purchased subset. If the coupon is not resident
    /// there (it was shown under a filter that never reached the canonical
    /// store), the purchased subset is cleared instead so the next
    /// `ensure_loaded` re-fetches it from the server - no entry is ever
    /// fabricated locally.
    pub async fn purchase_coupon(&self, id: CouponId) {
        match self.gateway.create(Resource::PurchaseCoupon(id), &()).await {
            Ok(conf) if conf.success => {
                match self.store.coupon(id) {
                    Some(coupon) => self.store.add_customer_coupon(coupon),
                    None => {
                        warn!(%id, "purchased coupon missing from canonical collection");
                        self.store.clear_customer_coupons();
                    }
                }
                self.notifier.success(conf.message);
            }
            Ok(conf) => self.report_rejection(conf),
            Err(err) => self.report_mutation_failure(&err),
        }
    }

    // =========================================================================
    // Failure reporting
    // =========================================================================

    /// A list fetch failed: classify, surface, and drop the identity when
    /// the server no longer recognizes it.
    fn report_fetch_failure(&self, err: &GatewayError) {
        let kind = classify(err);
        warn!(error = %err, classified = ?kind, "list fetch failed");

        if kind == ErrorKind::Unauthenticated {
            self.store.clear_identity();
        }
        self.notifier.error(kind.to_string());
    }

    /// A mutation failed in transport: classify and surface. 401 gets the
    /// operation-specific wording and drops the identity.
    fn report_mutation_failure(&self, err: &GatewayError) {
        let kind = classify(err);
        warn!(error = %err, classified = ?kind, "mutation failed");

        match kind {
            ErrorKind::Unauthenticated => {
                self.store.clear_identity();
                self.notifier.error(messages::OPERATION_NOT_ALLOWED);
            }
            other => self.notifier.error(other.to_string()),
        }
    }

    /// The transport succeeded but the server reported `success: false`.
    /// The store stays untouched and the server's message is surfaced.
    fn report_rejection(&self, conf: Confirmation) {
        warn!(message = %conf.message, "server rejected mutation");
        let message = if conf.message.is_empty() {
            messages::GENERAL_ERROR.to_owned()
        } else {
            conf.message
        };
        self.notifier.error(message);
    }
}

/// Pull the created entity out of a confirmation payload, if the server sent
/// one back. A missing or malformed payload falls back to the submitted
/// entity.
fn entity_from_payload<T: serde::de::DeserializeOwned>(conf: &Confirmation) -> Option<T> {
    conf.payload
        .clone()
        .and_then(|payload| serde_json::from_value(payload).ok())
}
