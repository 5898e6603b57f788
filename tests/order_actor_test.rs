use jersey_store::clients::{OrderClient, ProductClient};
use jersey_store::framework::mock::MockClient;
use jersey_store::framework::EntityClient;
use jersey_store::model::{
    Address, Order, OrderCreate, OrderInput, OrderLine, OrderStatus, Product, ProductCreate, ProductId,
    UserId,
};
use jersey_store::order_actor::OrderError;
use jersey_store::product_actor::ProductActionResult;
use jersey_store::storage::MemoryStore;
use std::sync::Arc;

fn product(id: u64, stock: u32) -> Product {
    Product::new(
        ProductId(id),
        ProductCreate {
            name: format!("Jersey {id}"),
            team: "Italy".into(),
            price: 1000.0,
            stock,
            ..Default::default()
        },
    )
}

fn order_for(lines: &[(u64, u32)]) -> OrderCreate {
    OrderCreate {
        user_id: Some(UserId(3)),
        input: OrderInput {
            items: lines
                .iter()
                .map(|&(id, quantity)| OrderLine {
                    product: product(id, 0).snapshot(),
                    size: "M".into(),
                    quantity,
                    unit_price: 1000.0,
                })
                .collect(),
            total: 3000.0,
            address: Address::new("Sochi", "Kurortny 3"),
            payment_method: "card".into(),
        },
    }
}

/// Real Order actor with a mocked Product dependency.
///
/// Pattern 2: Actor + Mocks
/// - Real Order actor (tests the stock logic in on_create)
/// - Mocked Product client (isolates the catalog)
#[tokio::test]
async fn test_order_actor_records_sale_through_product_client() {
    let mut product_mock = MockClient::<Product>::new();
    product_mock.expect_get(ProductId(1)).return_ok(Some(product(1, 5)));
    product_mock
        .expect_action(ProductId(1))
        .return_ok(ProductActionResult::RecordSale(2));

    let product_client = ProductClient::new(product_mock.client());
    let (order_actor, order_client) =
        jersey_store::order_actor::new(8, Arc::new(MemoryStore::new()));
    let actor_handle = tokio::spawn(order_actor.run(product_client));

    let order_id = order_client
        .create_order(order_for(&[(1, 3)]))
        .await
        .expect("order should be placed");

    let order = order_client.get(order_id.clone()).await.unwrap().unwrap();
    assert_eq!(order.user_id, Some(UserId(3)));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.item_count(), 3);

    product_mock.verify();

    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_order_lines_for_one_product_are_checked_together() {
    let mut product_mock = MockClient::<Product>::new();
    // Two lines of product 1 need 4 units; only 3 are left, so no sale is recorded.
    product_mock.expect_get(ProductId(1)).return_ok(Some(product(1, 3)));

    let (order_actor, order_client) = jersey_store::order_actor::new(8, Arc::new(MemoryStore::new()));
    let actor_handle = tokio::spawn(order_actor.run(ProductClient::new(product_mock.client())));

    let result = order_client.create_order(order_for(&[(1, 2), (1, 2)])).await;
    assert!(matches!(result, Err(OrderError::InsufficientStock(_))));

    product_mock.verify();
    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_overflowing_line_quantities_are_rejected() {
    // The quantity check fails before any product is read.
    let product_mock = MockClient::<Product>::new();

    let (order_actor, order_client) = jersey_store::order_actor::new(8, Arc::new(MemoryStore::new()));
    let actor_handle = tokio::spawn(order_actor.run(ProductClient::new(product_mock.client())));

    let result = order_client
        .create_order(order_for(&[(1, u32::MAX), (1, u32::MAX)]))
        .await;
    assert!(matches!(result, Err(OrderError::ValidationError(_))));

    // The actor is still serving.
    assert_eq!(order_client.list().await.unwrap().len(), 2);

    product_mock.verify();
    drop(order_client);
    actor_handle.await.unwrap();
}

#[tokio::test]
async fn test_unknown_product_rejects_order() {
    let mut product_mock = MockClient::<Product>::new();
    product_mock.expect_get(ProductId(42)).return_ok(None);

    let store = Arc::new(MemoryStore::new());
    let (order_actor, order_client) = jersey_store::order_actor::new(8, store);
    let actor_handle = tokio::spawn(order_actor.run(ProductClient::new(product_mock.client())));

    let before = order_client.list().await.unwrap().len();
    let result = order_client.create_order(order_for(&[(42, 1)])).await;

    assert_eq!(result, Err(OrderError::InvalidProduct("42".into())));
    assert_eq!(order_client.list().await.unwrap().len(), before);

    product_mock.verify();
    drop(order_client);
    actor_handle.await.unwrap();
}

/// Pattern 1: pure mock, no actor at all.
#[tokio::test]
async fn test_order_client_with_mock() {
    let mut order_mock = MockClient::<Order>::new();
    order_mock.expect_create().return_ok("ORD-1".into());

    let client = OrderClient::new(order_mock.client());
    let id = client.create_order(order_for(&[(1, 1)])).await.unwrap();

    assert_eq!(id.to_string(), "ORD-1");
    order_mock.verify();
}
