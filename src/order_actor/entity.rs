//! Entity trait implementation for the Order domain type.
//!
//! Placing an order talks to the Product actor through the injected
//! [`ProductClient`] context: every line is checked against current stock
//! before any sale is recorded.

use super::error::OrderError;
use super::seed;
use crate::clients::ProductClient;
use crate::framework::{Entity, EntityClient};
use crate::model::{Order, OrderCreate, OrderFilter, OrderId, OrderUpdate, ProductId};
use crate::storage::keys;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

#[async_trait]
impl Entity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Action = ();
    type ActionResult = ();
    type Filter = OrderFilter;
    type Context = ProductClient;
    type Error = OrderError;

    const COLLECTION: &'static str = keys::ORDERS;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// `ORD-<unix millis>`, never behind the last issued id and moved forward
    /// one millisecond while taken.
    fn next_id(existing: &HashMap<OrderId, Self>, last_issued: Option<&OrderId>) -> OrderId {
        let floor = last_issued
            .and_then(OrderId::millis)
            .map_or(i64::MIN, |millis| millis.saturating_add(1));
        let mut millis = Utc::now().timestamp_millis().max(floor);
        loop {
            let id = OrderId::from_millis(millis);
            if !existing.contains_key(&id) {
                return id;
            }
            millis += 1;
        }
    }

    fn seed() -> Vec<Self> {
        seed::orders()
    }

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        let input = &params.input;
        if input.items.is_empty() {
            return Err(OrderError::ValidationError("order has no items".into()));
        }
        if let Some(line) = input.items.iter().find(|line| line.quantity == 0) {
            return Err(OrderError::ValidationError(format!(
                "zero quantity for product {}",
                line.product.id
            )));
        }
        if !input.total.is_finite() || input.total < 0.0 {
            return Err(OrderError::ValidationError(format!(
                "invalid total {}",
                input.total
            )));
        }
        Ok(Order::new(id, params))
    }

    /// Checks stock for every line, then records the sales.
    ///
    /// # Context Usage
    /// Uses the injected [`ProductClient`] to read and mutate products.
    async fn on_create(&mut self, products: &ProductClient) -> Result<(), OrderError> {
        let mut wanted: BTreeMap<ProductId, u32> = BTreeMap::new();
        for line in &self.items {
            let total = wanted.entry(line.product.id).or_default();
            *total = total.checked_add(line.quantity).ok_or_else(|| {
                OrderError::ValidationError(format!("quantity overflow for product {}", line.product.id))
            })?;
        }

        for (&product_id, &quantity) in &wanted {
            debug!(order_id = %self.id, %product_id, quantity, "Checking stock");
            let product = products
                .get(product_id)
                .await?
                .ok_or_else(|| OrderError::InvalidProduct(product_id.to_string()))?;
            if product.stock < quantity {
                return Err(OrderError::InsufficientStock(format!(
                    "{}: requested {}, available {}",
                    product.name, quantity, product.stock
                )));
            }
        }

        for (&product_id, &quantity) in &wanted {
            products.record_sale(product_id, quantity).await?;
        }
        info!(order_id = %self.id, lines = self.items.len(), total = self.total, "Stock recorded");
        Ok(())
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &ProductClient) -> Result<(), OrderError> {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(payment_method) = update.payment_method {
            self.payment_method = payment_method;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    async fn handle_action(&mut self, _action: (), _ctx: &ProductClient) -> Result<(), OrderError> {
        Ok(())
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.id.0.as_str(),
            self.payment_method.as_str(),
            self.address.city.as_str(),
            self.address.street.as_str(),
        ]
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.matches(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Address, OrderInput};

    #[test]
    fn test_next_id_skips_taken_millis() {
        let first = Order::next_id(&HashMap::new(), None);
        let taken = Order::new(
            first.clone(),
            OrderCreate {
                user_id: None,
                input: OrderInput {
                    items: Vec::new(),
                    total: 0.0,
                    address: Address::new("Kazan", "Baumana 1"),
                    payment_method: "card".into(),
                },
            },
        );
        let existing = HashMap::from([(first.clone(), taken)]);
        let second = Order::next_id(&existing, None);
        assert_ne!(first, second);
        assert!(second.millis() > first.millis());
    }

    #[test]
    fn test_next_id_stays_ahead_of_last_issued() {
        let future = OrderId::from_millis(Utc::now().timestamp_millis() + 60_000);
        let next = Order::next_id(&HashMap::new(), Some(&future));
        assert_eq!(next.millis(), future.millis().map(|m| m + 1));
    }

    #[test]
    fn test_create_rejects_empty_order() {
        let params = OrderCreate {
            user_id: None,
            input: OrderInput {
                items: Vec::new(),
                total: 0.0,
                address: Address::new("Kazan", "Baumana 1"),
                payment_method: "card".into(),
            },
        };
        assert!(matches!(
            Order::from_create_params(OrderId::from("ORD-1"), params),
            Err(OrderError::ValidationError(_))
        ));
    }
}
