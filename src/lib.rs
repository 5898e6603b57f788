//! # Jersey Store
//!
//! The data layer of a retro-jersey storefront: catalog, accounts, orders,
//! cart, wishlist, notifications, a mock REST API and an admin back-office,
//! persisted into a flat key-value store.
//!
//! ## Design
//!
//! ### Single-writer collections
//! Every collection (products, users, orders) is owned by one
//! [`CollectionActor`](framework::CollectionActor) running in its own Tokio
//! task. Requests arrive over a channel and are applied one at a time, and the
//! whole collection is written back as a single JSON array after every
//! mutation. Two concurrent writes to one collection are ordered, never lost.
//!
//! ### Seeding
//! A collection whose key is missing, unreadable or empty is replaced by its
//! default dataset on start. Parse failures are logged, never returned.
//!
//! ### Type-safe errors
//! Each collection has its own error type ([`ProductError`](product_actor::ProductError),
//! [`UserError`](user_actor::UserError), [`OrderError`](order_actor::OrderError));
//! the contexts, API and back-office wrap them in theirs.
//!
//! ### Context injection
//! Dependencies are injected when an actor starts, not when it is built: the
//! Order actor receives a [`ProductClient`](clients::ProductClient) so placing
//! an order can check and record stock.
//!
//! ## Module Tour
//!
//! - [`storage`] - the key-value backends (in-memory, JSON files)
//! - [`framework`] - the generic actor, client, entity trait and search
//! - [`model`] - records and their create/update/filter DTOs
//! - [`product_actor`], [`user_actor`], [`order_actor`] - one `Entity` impl each
//! - [`clients`] - typed clients per collection
//! - [`context`] - session, cart, wishlist, toasts
//! - [`api`] - the mock REST API
//! - [`admin`] - role-gated staff operations and the dashboard
//! - [`config`] - TOML configuration
//! - [`lifecycle`] - starting, wiring and stopping the system; tracing
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run -- store.toml
//! ```

pub mod admin;
pub mod api;
pub mod clients;
pub mod config;
pub mod context;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod product_actor;
pub mod storage;
pub mod user_actor;
