//! # Entity Trait
//!
//! The contract every stored record type (Product, User, Order) implements so
//! that one generic [`CollectionActor`](super::CollectionActor) can load, seed,
//! mutate, search and persist it.
//!
//! Associated types keep each collection's payloads apart: a `ProductCreate`
//! can only ever reach the product actor.
//!
//! # Provided Methods (Hooks)
//! - [`Entity::seed`] - default dataset, empty unless overridden
//! - [`Entity::on_create`] / [`Entity::on_delete`] - no-ops unless overridden

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record type managed by a [`CollectionActor`](super::CollectionActor).
///
/// # Async & Context
/// Hooks are `async` so they may call other actors. The `Context` type is
/// injected into every hook by [`CollectionActor::run`](super::CollectionActor::run),
/// which lets dependencies be wired after construction.
#[async_trait]
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Primary key. `Ord` gives listings a stable order.
    type Id: Eq + Hash + Ord + Clone + Send + Sync + Display + Debug + Serialize + DeserializeOwned;

    /// Payload for creating a record.
    type Create: Send + Sync + Debug;

    /// Partial record for shallow-merge updates.
    type Update: Send + Sync + Debug;

    /// Record-specific operations beyond CRUD (e.g. `RecordSale`).
    type Action: Send + Sync + Debug;

    /// Result of an [`Entity::Action`].
    type ActionResult: Send + Sync + Debug;

    /// Typed equality/range filter used by searches.
    type Filter: Send + Sync + Debug;

    /// Dependencies injected at run time. `()` when there are none.
    type Context: Send + Sync;

    /// Error raised by hooks and actions.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Storage key holding the serialized collection.
    const COLLECTION: &'static str;

    fn id(&self) -> &Self::Id;

    /// Picks the id for the next created record.
    ///
    /// `last_issued` is the most recent id this collection handed out, even if
    /// that record was deleted since. The new id must differ from every id
    /// ever issued.
    fn next_id(existing: &HashMap<Self::Id, Self>, last_issued: Option<&Self::Id>) -> Self::Id;

    /// Default dataset written when the collection is missing, unreadable or empty.
    fn seed() -> Vec<Self> {
        Vec::new()
    }

    /// Builds the full record from its id and creation payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Runs after construction, before the record is stored.
    /// An error here aborts the create.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Merges `update` into the record and stamps its update time.
    async fn on_update(&mut self, update: Self::Update, ctx: &Self::Context)
        -> Result<(), Self::Error>;

    /// Runs before the record is removed. An error here keeps it.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;

    // --- Search ---

    /// Text fields matched by free-text search.
    fn search_text(&self) -> Vec<&str>;

    fn matches(&self, filter: &Self::Filter) -> bool;
}
