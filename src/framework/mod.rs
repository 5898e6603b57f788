//! Generic collection framework.
//!
//! The building blocks every collection in the store is made of: one
//! single-writer actor per collection, a typed client to reach it, and a
//! trait the record types implement.
//!
//! # Main Components
//!
//! - [`Entity`] - Trait that record types implement to be managed by a collection
//! - [`CollectionActor`] - Generic actor that owns and persists a collection
//! - [`CollectionClient`] - Typed handle for sending requests to an actor
//! - [`EntityClient`] - Shared read/delete surface for collection-specific clients
//! - [`SearchQuery`] - Free-text + filter queries
//! - [`StoreError`] - Common error type
//!
//! # Testing
//!
//! See the `mock` module (unit tests and the `testing` feature) for utilities
//! to test clients without spawning full actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod search;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use actor::CollectionActor;
pub use client::CollectionClient;
pub use client_trait::EntityClient;
pub use entity::Entity;
pub use error::StoreError;
pub use message::{CollectionRequest, Response};
pub use search::SearchQuery;
