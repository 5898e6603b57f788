//! Entity trait implementation for the Product domain type.
//!
//! Enables [`Product`] to be managed by the generic
//! [`CollectionActor`](crate::framework::CollectionActor), including the stock
//! actions used by order placement and restocking.

use super::actions::{ProductAction, ProductActionResult};
use super::error::ProductError;
use super::seed;
use crate::framework::Entity;
use crate::model::product::clamp_rating;
use crate::model::{Product, ProductCreate, ProductFilter, ProductId, ProductUpdate};
use crate::storage::keys;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;

#[async_trait]
impl Entity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Filter = ProductFilter;
    type Context = ();
    type Error = ProductError;

    const COLLECTION: &'static str = keys::PRODUCTS;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// One past the highest id ever issued.
    fn next_id(existing: &HashMap<ProductId, Self>, last_issued: Option<&ProductId>) -> ProductId {
        let high = existing.keys().chain(last_issued).map(|id| id.0).max().unwrap_or(0);
        ProductId(high + 1)
    }

    fn seed() -> Vec<Self> {
        seed::products()
    }

    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        validate_name(&params.name)?;
        validate_price(params.price)?;
        Ok(Product::new(id, params))
    }

    /// Shallow merge of the `Some` fields; stamps `updated_at`.
    async fn on_update(&mut self, update: ProductUpdate, _ctx: &()) -> Result<(), ProductError> {
        if let Some(name) = update.name {
            validate_name(&name)?;
            self.name = name;
        }
        if let Some(price) = update.price {
            validate_price(price)?;
            self.price = price;
        }
        if let Some(team) = update.team {
            self.team = team;
        }
        if let Some(color) = update.color {
            self.color = color;
        }
        if let Some(cost) = update.cost {
            self.cost = Some(cost);
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        if let Some(rating) = update.rating {
            self.rating = clamp_rating(rating);
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(sizes) = update.sizes {
            self.sizes = sizes;
        }
        if let Some(image) = update.image {
            self.image = image;
        }
        if let Some(featured) = update.featured {
            self.featured = featured;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// # Actions
    /// - `CheckStock`: returns the stock level
    /// - `RecordSale`: moves units from stock to sold, fails on insufficient stock
    /// - `Restock`: adds units to stock
    async fn handle_action(
        &mut self,
        action: ProductAction,
        _ctx: &(),
    ) -> Result<ProductActionResult, ProductError> {
        match action {
            ProductAction::CheckStock => Ok(ProductActionResult::CheckStock(self.stock)),
            ProductAction::RecordSale(quantity) => {
                if quantity == 0 {
                    return Err(ProductError::InvalidQuantity(quantity));
                }
                if self.stock < quantity {
                    return Err(ProductError::InsufficientStock {
                        requested: quantity,
                        available: self.stock,
                    });
                }
                self.stock -= quantity;
                self.sold = self.sold.saturating_add(quantity);
                self.updated_at = Utc::now();
                Ok(ProductActionResult::RecordSale(self.stock))
            }
            ProductAction::Restock(quantity) => {
                if quantity == 0 {
                    return Err(ProductError::InvalidQuantity(quantity));
                }
                self.stock = self.stock.saturating_add(quantity);
                self.updated_at = Utc::now();
                Ok(ProductActionResult::Restock(self.stock))
            }
        }
    }

    fn search_text(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.team.as_str(),
            self.color.as_str(),
            self.category.as_str(),
        ]
    }

    fn matches(&self, filter: &ProductFilter) -> bool {
        filter.matches(self)
    }
}

fn validate_name(name: &str) -> Result<(), ProductError> {
    if name.trim().is_empty() {
        return Err(ProductError::ValidationError("name is empty".into()));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ProductError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ProductError::ValidationError(format!("invalid price {price}")));
    }
    Ok(())
}
