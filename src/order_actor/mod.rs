//! Order collection logic and entity implementation.
//!
//! The Order actor is the one collection with a dependency: its
//! [`Context`](crate::framework::Entity::Context) is a [`ProductClient`], so
//! placing an order can check and record stock.

pub mod entity;
pub mod error;
mod seed;

pub use error::*;

use crate::clients::OrderClient;
use crate::framework::CollectionActor;
use crate::model::Order;
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Creates a new Order actor and its client.
///
/// Run the actor with a `ProductClient`: `tokio::spawn(actor.run(product_client))`.
pub fn new(buffer_size: usize, storage: Arc<dyn KeyValueStore>) -> (CollectionActor<Order>, OrderClient) {
    let (actor, generic_client) = CollectionActor::new(buffer_size, storage);
    (actor, OrderClient::new(generic_client))
}
