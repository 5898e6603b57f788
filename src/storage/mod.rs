//! # Key-Value Storage
//!
//! The flat, persistent key space every collection and context writes into.
//! Values are JSON strings; a key holds one whole collection (or one piece of
//! session state), never a single record.
//!
//! Two backends ship with the crate:
//!
//! - [`MemoryStore`] - process-local map, used by tests and throwaway sessions.
//! - [`FileStore`] - one `<key>.json` file per key inside a data directory.
//!
//! Both are used through `Arc<dyn KeyValueStore>` so actors and contexts never
//! reach a global store directly.

pub mod error;
pub mod file;
pub mod memory;

pub use error::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Well-known keys of the storefront key space.
pub mod keys {
    pub const PRODUCTS: &str = "products";
    pub const USERS: &str = "users";
    pub const ORDERS: &str = "orders";
    pub const CURRENT_USER: &str = "current_user";
    pub const AUTH_TOKEN: &str = "auth_token";
    pub const CART: &str = "cart";
    pub const WISHLIST: &str = "wishlist";

    /// Highest id a collection has handed out, kept apart from the
    /// collection so deletes never lower it.
    pub fn last_issued(collection: &str) -> String {
        format!("{collection}_last_id")
    }
}

/// A persistent string-to-string store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Loads the raw value of `key`, `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replaces the value of `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Loads and deserializes a typed value.
///
/// A missing key and an unparseable value both come back as `Ok(None)`;
/// the parse failure is logged, not returned.
pub async fn load_typed<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding unreadable value");
            Ok(None)
        }
    }
}

/// Serializes and saves a typed value.
pub async fn save_typed<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw).await
}
