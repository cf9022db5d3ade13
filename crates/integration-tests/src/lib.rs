//! Test support for driving the client core without a server.
//!
//! [`MockGateway`] implements the `Gateway` trait over canned responses and
//! records every call it receives, so tests can assert both the store's
//! final state and the exact remote traffic that produced it.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use coupon_market_client::{Confirmation, Gateway, GatewayError, Notification, Resource};
use coupon_market_core::{
    Category, Company, CompanyId, Coupon, CouponId, Customer, CustomerId, Email, Identity, Role,
};

// =============================================================================
// MockGateway
// =============================================================================

#[derive(Default)]
struct MockState {
    lists: HashMap<String, VecDeque<Result<Value, GatewayError>>>,
    confirmations: VecDeque<Result<Confirmation, GatewayError>>,
    list_calls: Vec<String>,
    mutation_calls: Vec<(&'static str, String)>,
}

/// A `Gateway` fed from canned responses.
///
/// List responses are queued per resource path; confirmations are a single
/// queue shared by create/update/delete in call order. An optional delay
/// keeps list requests in flight long enough for concurrency tests.
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
    delay: Option<Duration>,
}

impl MockGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold every list request in flight for `delay` before answering.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Queue the next list response for a resource.
    pub fn queue_list(&self, resource: Resource, result: Result<Value, GatewayError>) {
        self.lock()
            .lists
            .entry(resource.path())
            .or_default()
            .push_back(result);
    }

    /// Queue the next confirmation for any mutation verb.
    pub fn queue_confirmation(&self, result: Result<Confirmation, GatewayError>) {
        self.lock().confirmations.push_back(result);
    }

    /// Paths of every list call received, in order.
    #[must_use]
    pub fn list_calls(&self) -> Vec<String> {
        self.lock().list_calls.clone()
    }

    /// Verb and path of every mutation call received, in order.
    #[must_use]
    pub fn mutation_calls(&self) -> Vec<(&'static str, String)> {
        self.lock().mutation_calls.clone()
    }

    fn take_list(&self, resource: Resource) -> Result<Value, GatewayError> {
        let path = resource.path();
        let mut state = self.lock();
        state.list_calls.push(path.clone());
        state
            .lists
            .get_mut(&path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("unexpected list call: {path}"))
    }

    fn take_confirmation(&self, verb: &'static str, resource: Resource) -> Result<Confirmation, GatewayError> {
        let mut state = self.lock();
        state.mutation_calls.push((verb, resource.path()));
        state
            .confirmations
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {verb} call: {}", resource.path()))
    }
}

impl Gateway for MockGateway {
    fn list<T>(
        &self,
        resource: Resource,
    ) -> impl std::future::Future<Output = Result<Vec<T>, GatewayError>> + Send
    where
        T: DeserializeOwned,
    {
        let queued = self.take_list(resource);
        let delay = self.delay;
        async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let value = queued?;
            Ok(serde_json::from_value(value)?)
        }
    }

    fn create<B>(
        &self,
        resource: Resource,
        _body: &B,
    ) -> impl std::future::Future<Output = Result<Confirmation, GatewayError>> + Send
    where
        B: Serialize + Sync,
    {
        let queued = self.take_confirmation("create", resource);
        async move { queued }
    }

    fn update<B>(
        &self,
        resource: Resource,
        _body: &B,
    ) -> impl std::future::Future<Output = Result<Confirmation, GatewayError>> + Send
    where
        B: Serialize + Sync,
    {
        let queued = self.take_confirmation("update", resource);
        async move { queued }
    }

    fn delete(
        &self,
        resource: Resource,
    ) -> impl std::future::Future<Output = Result<Confirmation, GatewayError>> + Send {
        let queued = self.take_confirmation("delete", resource);
        async move { queued }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A confirmed-success response with a server message.
#[must_use]
pub fn confirmed(message: &str) -> Confirmation {
    Confirmation {
        success: true,
        message: message.to_owned(),
        payload: None,
    }
}

/// A non-exceptional rejection: 2xx transport, `success: false`.
#[must_use]
pub fn rejected(message: &str) -> Confirmation {
    Confirmation {
        success: false,
        message: message.to_owned(),
        payload: None,
    }
}

#[must_use]
pub fn sample_company(id: i32, name: &str) -> Company {
    Company {
        id: CompanyId::new(id),
        name: name.to_owned(),
        email: Email::parse("office@acme.example").unwrap(),
        password: "pw".to_owned(),
        coupons: Vec::new(),
    }
}

#[must_use]
pub fn sample_customer(id: i32, first_name: &str) -> Customer {
    Customer {
        id: CustomerId::new(id),
        first_name: first_name.to_owned(),
        last_name: "Levi".to_owned(),
        email: Email::parse("dana@example.com").unwrap(),
        password: "pw".to_owned(),
        coupons: Vec::new(),
    }
}

#[must_use]
pub fn sample_coupon(id: i32, title: &str) -> Coupon {
    Coupon {
        id: CouponId::new(id),
        company_id: CompanyId::new(1),
        category: Category::Vacation,
        title: title.to_owned(),
        description: "limited offer".to_owned(),
        start_date: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2024, 8, 31, 0, 0, 0).unwrap(),
        amount: 25,
        price: Decimal::new(4990, 2),
        image: Uuid::nil(),
    }
}

#[must_use]
pub fn identity(role: Role) -> Identity {
    Identity::new(1, role, SecretString::from("test-token"))
}

/// Serialize entities into the JSON a list endpoint would return.
#[must_use]
pub fn as_list<T: Serialize>(items: &[T]) -> Value {
    serde_json::to_value(items).unwrap()
}

/// Drain every notification currently buffered on a receiver.
pub fn drain(
    rx: &mut tokio::sync::broadcast::Receiver<Notification>,
) -> Vec<Notification> {
    let mut all = Vec::new();
    while let Ok(notification) = rx.try_recv() {
        all.push(notification);
    }
    all
}
