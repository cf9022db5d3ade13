//! Fetch orchestration: idempotent loads, in-flight de-duplication, and
//! failure handling that leaves the store untouched.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use coupon_market_client::{
    CollectionKind, CouponClient, CouponFilter, EntityStore, ErrorBody, GatewayError, Resource,
    Severity,
};
use coupon_market_core::{Category, Coupon, Role};
use rust_decimal::Decimal;

use coupon_market_integration_tests::{
    MockGateway, as_list, drain, identity, sample_company, sample_coupon,
};

fn client_with(gateway: MockGateway) -> CouponClient<MockGateway> {
    let store = EntityStore::new();
    store.set_identity(identity(Role::Admin));
    CouponClient::new(store, gateway)
}

#[tokio::test]
async fn ensure_loaded_fetches_once_and_serves_cache_after() {
    let gateway = MockGateway::new();
    gateway.queue_list(
        Resource::Companies,
        Ok(as_list(&[sample_company(1, "Acme"), sample_company(2, "Bolt")])),
    );
    let client = client_with(gateway.clone());
    let mut rx = client.notifier().subscribe();

    client.ensure_loaded(CollectionKind::Companies).await;
    client.ensure_loaded(CollectionKind::Companies).await;

    assert_eq!(gateway.list_calls(), ["companies"]);
    assert_eq!(client.store().companies().len(), 2);

    // One load, one success message.
    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes.first().unwrap().message, "got all companies");
    assert_eq!(notes.first().unwrap().severity, Severity::Success);
}

#[tokio::test]
async fn concurrent_loads_share_one_request() {
    let gateway = MockGateway::new().with_delay(Duration::from_millis(10));
    gateway.queue_list(Resource::Coupons, Ok(as_list(&[sample_coupon(7, "Summer Sale")])));
    let client = client_with(gateway.clone());

    tokio::join!(
        client.ensure_loaded(CollectionKind::Coupons),
        client.ensure_loaded(CollectionKind::Coupons),
    );

    assert_eq!(gateway.list_calls(), ["coupons"]);
    assert_eq!(client.store().coupons().len(), 1);
}

#[tokio::test]
async fn collections_load_independently() {
    let gateway = MockGateway::new();
    gateway.queue_list(Resource::Coupons, Ok(as_list(&[sample_coupon(7, "Summer Sale")])));
    let client = client_with(gateway.clone());

    client.ensure_loaded(CollectionKind::Coupons).await;

    assert_eq!(gateway.list_calls(), ["coupons"]);
    assert!(client.store().is_empty(CollectionKind::Companies));
    assert!(client.store().is_empty(CollectionKind::CustomerCoupons));
}

#[tokio::test]
async fn fetch_replaces_collection_wholesale() {
    let gateway = MockGateway::new();
    gateway.queue_list(
        Resource::CustomerCoupons,
        Ok(as_list(&[sample_coupon(7, "Summer Sale")])),
    );
    let client = client_with(gateway);

    // A stale entry left behind would survive a merge but not a replace.
    client.store().replace_customer_coupons(vec![]);
    client.ensure_loaded(CollectionKind::CustomerCoupons).await;

    let titles: Vec<_> = client
        .store()
        .customer_coupons()
        .into_iter()
        .map(|c| c.title)
        .collect();
    assert_eq!(titles, ["Summer Sale"]);
}

#[tokio::test]
async fn failed_fetch_leaves_store_untouched_and_reports() {
    let gateway = MockGateway::new();
    gateway.queue_list(
        Resource::Companies,
        Err(GatewayError::Status {
            status: 500,
            body: ErrorBody::Empty,
        }),
    );
    let client = client_with(gateway);
    let mut rx = client.notifier().subscribe();

    client.ensure_loaded(CollectionKind::Companies).await;

    assert!(client.store().is_empty(CollectionKind::Companies));
    let notes = drain(&mut rx);
    assert_eq!(notes.len(), 1);
    assert_eq!(notes.first().unwrap().severity, Severity::Error);
    assert_eq!(
        notes.first().unwrap().message,
        "general error occurred, please try again."
    );
}

#[tokio::test]
async fn unauthenticated_fetch_clears_identity() {
    let gateway = MockGateway::new();
    gateway.queue_list(
        Resource::Customers,
        Err(GatewayError::Status {
            status: 401,
            body: ErrorBody::Empty,
        }),
    );
    let client = client_with(gateway);
    let mut rx = client.notifier().subscribe();

    client.ensure_loaded(CollectionKind::Customers).await;

    assert!(client.store().identity().is_none());
    let notes = drain(&mut rx);
    assert_eq!(notes.first().unwrap().message, "please login to the site");
}

#[tokio::test]
async fn failed_fetch_retries_on_next_ensure() {
    let gateway = MockGateway::new();
    gateway.queue_list(Resource::Companies, Err(GatewayError::Transport("down".to_owned())));
    gateway.queue_list(Resource::Companies, Ok(as_list(&[sample_company(1, "Acme")])));
    let client = client_with(gateway.clone());

    client.ensure_loaded(CollectionKind::Companies).await;
    assert!(client.store().is_empty(CollectionKind::Companies));

    // The collection is still empty, so the heuristic fetches again.
    client.ensure_loaded(CollectionKind::Companies).await;
    assert_eq!(gateway.list_calls().len(), 2);
    assert_eq!(client.store().companies().len(), 1);
}

#[tokio::test]
async fn filtered_fetch_bypasses_cache_and_store() {
    let gateway = MockGateway::new();
    gateway.queue_list(Resource::Coupons, Ok(as_list(&[sample_coupon(7, "Summer Sale")])));
    gateway.queue_list(
        Resource::CouponsByCategory(Category::Vacation),
        Ok(as_list(&[sample_coupon(9, "Weekend Getaway")])),
    );
    let client = client_with(gateway.clone());

    client.ensure_loaded(CollectionKind::Coupons).await;
    let filtered: Vec<Coupon> = client
        .filtered_coupons(CouponFilter::Category(Category::Vacation))
        .await;

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.first().unwrap().title, "Weekend Getaway");

    // The canonical collection still holds the unfiltered snapshot.
    let canonical = client.store().coupons();
    assert_eq!(canonical.len(), 1);
    assert_eq!(canonical.first().unwrap().title, "Summer Sale");
}

#[tokio::test]
async fn empty_filter_result_reports_and_returns_empty() {
    let gateway = MockGateway::new();
    gateway.queue_list(Resource::CouponsByCategory(Category::Spa), Ok(as_list::<Coupon>(&[])));
    let client = client_with(gateway);
    let mut rx = client.notifier().subscribe();

    let filtered = client
        .filtered_coupons(CouponFilter::Category(Category::Spa))
        .await;

    assert!(filtered.is_empty());
    let notes = drain(&mut rx);
    assert_eq!(notes.first().unwrap().message, "no coupons from this filter");
}

#[tokio::test]
async fn max_price_filter_hits_the_price_endpoint() {
    let gateway = MockGateway::new();
    let ceiling = Decimal::new(5000, 2);
    gateway.queue_list(
        Resource::CouponsByMaxPrice(ceiling),
        Ok(as_list(&[sample_coupon(7, "Summer Sale")])),
    );
    let client = client_with(gateway.clone());

    let filtered = client.filtered_coupons(CouponFilter::MaxPrice(ceiling)).await;

    assert_eq!(gateway.list_calls(), ["coupons/max-price/50.00"]);
    assert_eq!(filtered.len(), 1);
    assert!(client.store().is_empty(CollectionKind::Coupons));
}

#[tokio::test]
async fn filtered_fetch_always_issues_a_fresh_request() {
    let gateway = MockGateway::new();
    let filter = Resource::CouponsByCategory(Category::Food);
    gateway.queue_list(filter, Ok(as_list(&[sample_coupon(3, "Pizza")])));
    gateway.queue_list(filter, Ok(as_list(&[sample_coupon(3, "Pizza")])));
    let client = client_with(gateway.clone());

    client.filtered_coupons(CouponFilter::Category(Category::Food)).await;
    client.filtered_coupons(CouponFilter::Category(Category::Food)).await;

    assert_eq!(gateway.list_calls().len(), 2);
}
