//! # Wishlist
//!
//! Saved products, at most one entry per product id, mirrored to the
//! `wishlist` key.

use super::{mirror, restore};
use crate::model::{ProductId, ProductSnapshot};
use crate::storage::{keys, KeyValueStore};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WishlistToggle {
    Added,
    Removed,
}

pub struct Wishlist {
    storage: Arc<dyn KeyValueStore>,
    items: Vec<ProductSnapshot>,
}

impl Wishlist {
    /// Restores the wishlist, dropping duplicate ids from older data.
    pub async fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let stored: Vec<ProductSnapshot> = restore(storage.as_ref(), keys::WISHLIST)
            .await
            .unwrap_or_default();
        let mut seen = HashSet::new();
        let items: Vec<_> = stored.into_iter().filter(|item| seen.insert(item.id)).collect();
        debug!(items = items.len(), "Wishlist loaded");
        Self { storage, items }
    }

    /// Adds the product if absent, removes it otherwise.
    pub async fn toggle(&mut self, product: ProductSnapshot) -> WishlistToggle {
        let outcome = if self.contains(product.id) {
            self.items.retain(|item| item.id != product.id);
            WishlistToggle::Removed
        } else {
            self.items.push(product);
            WishlistToggle::Added
        };
        self.save().await;
        outcome
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.items.iter().any(|item| item.id == id)
    }

    /// Returns whether the product was present.
    pub async fn remove(&mut self, id: ProductId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.items.retain(|item| item.id != id);
        self.save().await;
        true
    }

    pub async fn clear(&mut self) {
        self.items.clear();
        self.save().await;
    }

    pub fn items(&self) -> &[ProductSnapshot] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    async fn save(&self) {
        mirror(self.storage.as_ref(), keys::WISHLIST, &self.items).await;
    }
}
