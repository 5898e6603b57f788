//! # Cart
//!
//! Lines keyed by (product, size), mirrored to the `cart` key after every
//! change. Totals are never stored; they are recomputed from the lines.

use super::auth::AuthError;
use super::session::Session;
use super::{mirror, restore};
use crate::config::PricingRules;
use crate::model::{Address, OrderId, OrderInput, OrderLine, ProductId, ProductSnapshot};
use crate::storage::{keys, KeyValueStore};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// One (product, size, quantity) entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// List identity for the UI: `{product id}-{size}-{millis}`.
    pub key: String,
    pub product: ProductSnapshot,
    pub size: String,
    pub quantity: u32,
}

impl CartLine {
    pub fn subtotal(&self) -> f64 {
        self.product.price * f64::from(self.quantity)
    }
}

/// Pricing breakdown shown at checkout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OrderSummary {
    pub subtotal: f64,
    pub shipping: f64,
    pub tax: f64,
    pub total: f64,
}

impl PricingRules {
    /// Free shipping from the threshold up, flat fee below; tax is rounded
    /// to a whole unit. An empty cart costs nothing.
    pub fn summarize(&self, subtotal: f64) -> OrderSummary {
        if subtotal <= 0.0 {
            return OrderSummary::default();
        }
        let shipping = if subtotal >= self.free_shipping_threshold {
            0.0
        } else {
            self.shipping_fee
        };
        let tax = (subtotal * self.tax_rate).round();
        OrderSummary {
            subtotal,
            shipping,
            tax,
            total: subtotal + shipping + tax,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("Cart is empty")]
    Empty,
    #[error("Checkout validation error: {0}")]
    Validation(String),
    #[error("Checkout failed: {0}")]
    Checkout(#[from] AuthError),
}

pub struct Cart {
    storage: Arc<dyn KeyValueStore>,
    pricing: PricingRules,
    lines: Vec<CartLine>,
}

impl Cart {
    /// Restores the cart from storage; unreadable or missing data gives an empty cart.
    pub async fn load(storage: Arc<dyn KeyValueStore>, pricing: PricingRules) -> Self {
        let lines: Vec<CartLine> = restore(storage.as_ref(), keys::CART).await.unwrap_or_default();
        debug!(lines = lines.len(), "Cart loaded");
        Self {
            storage,
            pricing,
            lines,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds `quantity` of a product in a size, merging with an existing line.
    ///
    /// The line quantity is capped at the snapshot's stock. Returns the key of
    /// the affected line, or `None` when nothing was added (zero quantity or
    /// no stock).
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_item(&mut self, product: ProductSnapshot, size: &str, quantity: u32) -> Option<String> {
        if quantity == 0 || product.stock == 0 {
            debug!(quantity, stock = product.stock, "Nothing to add");
            return None;
        }
        let cap = product.stock;
        let key = match self
            .lines
            .iter_mut()
            .find(|line| line.product.id == product.id && line.size == size)
        {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity).min(cap);
                line.product = product;
                line.key.clone()
            }
            None => {
                let key = format!("{}-{}-{}", product.id, size, Utc::now().timestamp_millis());
                self.lines.push(CartLine {
                    key: key.clone(),
                    product,
                    size: size.to_string(),
                    quantity: quantity.min(cap),
                });
                key
            }
        };
        self.save().await;
        Some(key)
    }

    /// Removes a line. Returns whether it existed.
    pub async fn remove_item(&mut self, key: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.key != key);
        let removed = self.lines.len() < before;
        if removed {
            self.save().await;
        }
        removed
    }

    /// Sets a line's quantity; zero removes it. Returns whether the line existed.
    pub async fn set_quantity(&mut self, key: &str, quantity: u32) -> bool {
        if quantity == 0 {
            return self.remove_item(key).await;
        }
        let Some(line) = self.lines.iter_mut().find(|line| line.key == key) else {
            return false;
        };
        line.quantity = quantity.min(line.product.stock.max(1));
        self.save().await;
        true
    }

    pub async fn clear(&mut self) {
        self.lines.clear();
        self.save().await;
    }

    pub fn line_subtotal(&self, key: &str) -> Option<f64> {
        self.lines
            .iter()
            .find(|line| line.key == key)
            .map(CartLine::subtotal)
    }

    pub fn subtotal(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.lines.iter().any(|line| line.product.id == product_id)
    }

    pub fn summary(&self) -> OrderSummary {
        self.pricing.summarize(self.subtotal())
    }

    /// Validates the delivery details, places the order through the session
    /// and empties the cart.
    #[instrument(skip(self, session))]
    pub async fn checkout(
        &mut self,
        session: &mut Session,
        address: Address,
        payment_method: &str,
    ) -> Result<OrderId, CartError> {
        if self.lines.is_empty() {
            return Err(CartError::Empty);
        }
        if address.city.trim().is_empty() || address.street.trim().is_empty() {
            return Err(CartError::Validation("city and street are required".into()));
        }
        if payment_method.trim().is_empty() {
            return Err(CartError::Validation("payment method is required".into()));
        }

        let input = OrderInput {
            items: self
                .lines
                .iter()
                .map(|line| OrderLine {
                    product: line.product.clone(),
                    size: line.size.clone(),
                    quantity: line.quantity,
                    unit_price: line.product.price,
                })
                .collect(),
            total: self.summary().total,
            address,
            payment_method: payment_method.trim().to_string(),
        };
        let id = session.place_order(input).await?;
        info!(%id, items = self.item_count(), "Checked out");
        self.clear().await;
        Ok(id)
    }

    async fn save(&self) {
        mirror(self.storage.as_ref(), keys::CART, &self.lines).await;
    }
}
