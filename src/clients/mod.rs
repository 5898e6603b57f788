//! Type-safe wrappers around [`CollectionClient`](crate::framework::CollectionClient).
//!
//! Each client implements [`EntityClient`](crate::framework::EntityClient)
//! for the shared `get`/`list`/`search`/`delete` surface and adds the
//! collection's own operations with its own error type.

pub mod order_client;
pub mod product_client;
pub mod user_client;

pub use order_client::*;
pub use product_client::*;
pub use user_client::*;
