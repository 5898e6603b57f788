//! # Order Client
//!
//! Provides a high-level API for interacting with the `Order` actor.
//! Stock validation and sale recording happen in the Order actor's
//! `on_create` hook, not here.

use crate::framework::{CollectionClient, EntityClient, SearchQuery, StoreError};
use crate::model::{Order, OrderCreate, OrderFilter, OrderId, OrderStatus, OrderUpdate, UserId, UserStats};
use crate::order_actor::OrderError;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: CollectionClient<Order>,
}

impl OrderClient {
    pub fn new(inner: CollectionClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        let id = self.inner.create(params).await?;
        info!(%id, "Order placed");
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, OrderError> {
        Ok(self.inner.update(id, OrderUpdate::status(status)).await?)
    }

    /// Orders owned by `user_id`, newest first.
    #[instrument(skip(self))]
    pub async fn for_user(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        let query = SearchQuery::new().filter(OrderFilter::User(user_id));
        let mut orders = self.inner.search(query).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(orders)
    }

    /// Order count and spend for `user_id`. Cancelled orders count but do not spend.
    #[instrument(skip(self))]
    pub async fn stats_for_user(&self, user_id: UserId) -> Result<UserStats, OrderError> {
        Ok(stats(&self.for_user(user_id).await?))
    }
}

/// Aggregates a user's orders.
pub fn stats(orders: &[Order]) -> UserStats {
    UserStats {
        orders_count: orders.len(),
        total_spent: orders
            .iter()
            .filter(|order| !order.status.is_cancelled())
            .map(|order| order.total)
            .sum(),
    }
}

#[async_trait]
impl EntityClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &CollectionClient<Order> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        e.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::model::{Address, OrderInput};
    use chrono::Duration;

    fn order(millis: i64, total: f64, status: OrderStatus) -> Order {
        let mut order = Order::new(
            OrderId::from_millis(millis),
            OrderCreate {
                user_id: Some(UserId(3)),
                input: OrderInput {
                    items: Vec::new(),
                    total,
                    address: Address::new("Moscow", "Arbat 1"),
                    payment_method: "card".into(),
                },
            },
        );
        order.status = status;
        order.created_at += Duration::milliseconds(millis);
        order
    }

    #[tokio::test]
    async fn test_for_user_newest_first() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_search().return_ok(vec![
            order(1, 100.0, OrderStatus::Pending),
            order(3, 300.0, OrderStatus::Pending),
            order(2, 200.0, OrderStatus::Pending),
        ]);

        let client = OrderClient::new(mock.client());
        let ids: Vec<_> = client
            .for_user(UserId(3))
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();

        assert_eq!(ids, ["ORD-3", "ORD-2", "ORD-1"].map(OrderId::from));
        mock.verify();
    }

    #[test]
    fn test_stats_exclude_cancelled_spend() {
        let orders = [
            order(1, 1000.0, OrderStatus::Delivered),
            order(2, 500.0, OrderStatus::Cancelled),
            order(3, 250.0, OrderStatus::Pending),
        ];
        assert_eq!(
            stats(&orders),
            UserStats {
                orders_count: 3,
                total_spent: 1250.0
            }
        );
    }

    #[tokio::test]
    async fn test_update_status_miss() {
        let mut mock = MockClient::<Order>::new();
        let id = OrderId::from("ORD-404");
        mock.expect_update(id.clone())
            .return_err(StoreError::NotFound(id.to_string()));

        let client = OrderClient::new(mock.client());
        let result = client.update_status(id, OrderStatus::Shipped).await;

        assert_eq!(result, Err(OrderError::NotFound("ORD-404".into())));
        mock.verify();
    }
}
