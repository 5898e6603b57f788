//! # Domain Contexts
//!
//! Client-side state the storefront pages work with: who is signed in, what
//! is in the cart and wishlist, and which notifications are showing.
//!
//! Session, cart and wishlist mirror themselves into the key-value store after
//! every change and restore from it on load. A failed mirror write is logged
//! and the in-memory state stays authoritative.

pub mod auth;
pub mod cart;
pub mod session;
pub mod toast;
pub mod wishlist;

pub use auth::{Argon2Verifier, AuthError, Credential, CredentialVerifier, Registration};
#[cfg(any(test, feature = "testing"))]
pub use auth::AcceptAnyPassword;
pub use cart::{Cart, CartError, CartLine, OrderSummary};
pub use session::{Session, SessionState};
pub use toast::{Toast, ToastKind, Toasts};
pub use wishlist::{Wishlist, WishlistToggle};

use crate::storage::{self, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// Writes `value` under `key`, logging instead of failing.
pub(crate) async fn mirror<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) {
    if let Err(e) = storage::save_typed(store, key, value).await {
        warn!(key, error = %e, "Mirror write failed");
    }
}

/// Removes `key`, logging instead of failing.
pub(crate) async fn forget(store: &dyn KeyValueStore, key: &str) {
    if let Err(e) = store.remove(key).await {
        warn!(key, error = %e, "Mirror remove failed");
    }
}

/// Reads `key`; read and parse failures both come back as `None`.
pub(crate) async fn restore<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    match storage::load_typed(store, key).await {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Restore failed");
            None
        }
    }
}
