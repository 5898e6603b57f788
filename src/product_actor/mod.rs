//! # Product Actor
//!
//! The catalog collection, with stock actions beyond CRUD.
//!
//! ## Structure
//!
//! - [`entity`] - [`Entity`](crate::framework::Entity) implementation for [`Product`]
//! - [`error`] - [`ProductError`] type for type-safe error handling
//! - [`actions`] - [`ProductAction`] and [`ProductActionResult`] for stock management
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Custom Actions
//!
//! ```rust,ignore
//! // Check current stock level (read-only)
//! let stock = product_client.check_stock(product_id).await?;
//!
//! // Record a sale (mutating, can fail)
//! product_client.record_sale(product_id, quantity).await?;
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use jersey_store::product_actor;
//! use jersey_store::model::ProductCreate;
//! use jersey_store::storage::MemoryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, client) = product_actor::new(32, Arc::new(MemoryStore::new()));
//!     tokio::spawn(actor.run(()));
//!
//!     let params = ProductCreate {
//!         name: "Scotland 1978 Home".to_string(),
//!         price: 3990.0,
//!         stock: 10,
//!         ..Default::default()
//!     };
//!     let id = client.create_product(params).await?;
//!     client.record_sale(id, 2).await?;
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;
mod seed;

pub use actions::*;
pub use error::*;

use crate::clients::ProductClient;
use crate::framework::CollectionActor;
use crate::model::Product;
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Creates a new Product actor and its client.
pub fn new(
    buffer_size: usize,
    storage: Arc<dyn KeyValueStore>,
) -> (CollectionActor<Product>, ProductClient) {
    let (actor, generic_client) = CollectionActor::new(buffer_size, storage);
    (actor, ProductClient::new(generic_client))
}
