//! The entity store: a process-wide cache of server-backed collections and
//! the current identity.
//!
//! The store is the only shared mutable resource in the core. It exposes one
//! mutation entry point per operation kind and hands out cloned snapshots for
//! reading, so views never alias live state. Writes are whole-value
//! replacements - a full collection on fetch, a single entry on mutation -
//! applied only after the server confirms the operation.

use std::sync::{Arc, RwLock};

use coupon_market_core::{Company, CompanyId, Coupon, CouponId, Customer, CustomerId, Identity};

/// The four independently loaded collections.
///
/// Loading one never implies another is loaded or stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Companies,
    Customers,
    Coupons,
    /// The subset of [`CollectionKind::Coupons`] purchased by the current
    /// customer.
    CustomerCoupons,
}

#[derive(Default)]
struct StoreState {
    identity: Option<Identity>,
    companies: Vec<Company>,
    customers: Vec<Customer>,
    coupons: Vec<Coupon>,
    customer_coupons: Vec<Coupon>,
}

/// Process-wide entity cache.
///
/// Cheaply cloneable handle; all clones share the same state. Insertion
/// order is preserved for list display and ids are unique within a
/// collection.
#[derive(Clone, Default)]
pub struct EntityStore {
    inner: Arc<RwLock<StoreState>>,
}

impl EntityStore {
    /// Create an empty store with no identity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreState> {
        self.inner.read().expect("entity store lock poisoned")
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreState> {
        self.inner.write().expect("entity store lock poisoned")
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Snapshot of the current identity, if any.
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    /// Install the identity established at sign-in, replacing any prior one.
    pub fn set_identity(&self, identity: Identity) {
        self.write().identity = Some(identity);
    }

    /// Drop the current identity. Collections are left in place.
    pub fn clear_identity(&self) {
        self.write().identity = None;
    }

    /// Reset everything: identity and all four collections.
    ///
    /// Used at sign-out so cached data from one identity never serves the
    /// next.
    pub fn clear_all(&self) {
        *self.write() = StoreState::default();
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Ordered snapshot of the companies collection.
    #[must_use]
    pub fn companies(&self) -> Vec<Company> {
        self.read().companies.clone()
    }

    /// Ordered snapshot of the customers collection.
    #[must_use]
    pub fn customers(&self) -> Vec<Customer> {
        self.read().customers.clone()
    }

    /// Ordered snapshot of the coupons collection.
    #[must_use]
    pub fn coupons(&self) -> Vec<Coupon> {
        self.read().coupons.clone()
    }

    /// Ordered snapshot of the current customer's purchased coupons.
    #[must_use]
    pub fn customer_coupons(&self) -> Vec<Coupon> {
        self.read().customer_coupons.clone()
    }

    /// Look up a single coupon in the canonical coupons collection.
    #[must_use]
    pub fn coupon(&self, id: CouponId) -> Option<Coupon> {
        self.read().coupons.iter().find(|c| c.id == id).cloned()
    }

    /// Whether a collection currently holds no entries.
    #[must_use]
    pub fn is_empty(&self, kind: CollectionKind) -> bool {
        let state = self.read();
        match kind {
            CollectionKind::Companies => state.companies.is_empty(),
            CollectionKind::Customers => state.customers.is_empty(),
            CollectionKind::Coupons => state.coupons.is_empty(),
            CollectionKind::CustomerCoupons => state.customer_coupons.is_empty(),
        }
    }

    // =========================================================================
    // Companies
    // =========================================================================

    /// Replace the companies collection with a freshly fetched list.
    pub fn replace_companies(&self, companies: Vec<Company>) {
        self.write().companies = companies;
    }

    /// Replace the snapshot for this company's id in place, or append it.
    pub fn upsert_company(&self, company: Company) {
        let mut state = self.write();
        if let Some(slot) = state.companies.iter_mut().find(|c| c.id == company.id) {
            *slot = company;
        } else {
            state.companies.push(company);
        }
    }

    /// Remove a company by id. Removing an absent id is a no-op.
    pub fn remove_company(&self, id: CompanyId) {
        self.write().companies.retain(|c| c.id != id);
    }

    // =========================================================================
    // Customers
    // =========================================================================

    /// Replace the customers collection with a freshly fetched list.
    pub fn replace_customers(&self, customers: Vec<Customer>) {
        self.write().customers = customers;
    }

    /// Replace the snapshot for this customer's id in place, or append it.
    pub fn upsert_customer(&self, customer: Customer) {
        let mut state = self.write();
        if let Some(slot) = state.customers.iter_mut().find(|c| c.id == customer.id) {
            *slot = customer;
        } else {
            state.customers.push(customer);
        }
    }

    /// Remove a customer by id. Removing an absent id is a no-op.
    pub fn remove_customer(&self, id: CustomerId) {
        self.write().customers.retain(|c| c.id != id);
    }

    // =========================================================================
    // Coupons
    // =========================================================================

    /// Replace the coupons collection with a freshly fetched list.
    pub fn replace_coupons(&self, coupons: Vec<Coupon>) {
        self.write().coupons = coupons;
    }

    /// Replace the snapshot for this coupon's id in place, or append it.
    pub fn upsert_coupon(&self, coupon: Coupon) {
        let mut state = self.write();
        if let Some(slot) = state.coupons.iter_mut().find(|c| c.id == coupon.id) {
            *slot = coupon;
        } else {
            state.coupons.push(coupon);
        }
    }

    /// Remove a coupon by id from both the canonical collection and the
    /// purchased subset. Removing an absent id is a no-op.
    pub fn remove_coupon(&self, id: CouponId) {
        let mut state = self.write();
        state.coupons.retain(|c| c.id != id);
        state.customer_coupons.retain(|c| c.id != id);
    }

    // =========================================================================
    // Customer coupons
    // =========================================================================

    /// Replace the purchased-coupons collection with a freshly fetched list.
    pub fn replace_customer_coupons(&self, coupons: Vec<Coupon>) {
        self.write().customer_coupons = coupons;
    }

    /// Record a confirmed purchase. An id already present is left untouched.
    pub fn add_customer_coupon(&self, coupon: Coupon) {
        let mut state = self.write();
        if !state.customer_coupons.iter().any(|c| c.id == coupon.id) {
            state.customer_coupons.push(coupon);
        }
    }

    /// Drop the purchased-coupons collection so the next `ensure_loaded`
    /// re-fetches it.
    pub fn clear_customer_coupons(&self) {
        self.write().customer_coupons.clear();
    }
}
