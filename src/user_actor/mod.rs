//! User-specific collection logic and entity implementation.

pub mod entity;
pub mod error;
mod seed;

pub use entity::{UserAction, UserActionResult};
pub use error::*;

use crate::clients::UserClient;
use crate::framework::CollectionActor;
use crate::model::User;
use crate::storage::KeyValueStore;
use std::sync::Arc;

/// Creates a new User actor and its client.
pub fn new(buffer_size: usize, storage: Arc<dyn KeyValueStore>) -> (CollectionActor<User>, UserClient) {
    let (actor, generic_client) = CollectionActor::new(buffer_size, storage);
    (actor, UserClient::new(generic_client))
}
