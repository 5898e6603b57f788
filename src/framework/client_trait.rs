//! # EntityClient Trait
//!
//! Shared read/delete operations for the collection-specific clients, built on
//! the generic [`CollectionClient`].

use crate::framework::{CollectionClient, Entity, SearchQuery, StoreError};
use async_trait::async_trait;

/// Implemented by `ProductClient`, `UserClient` and `OrderClient` to inherit
/// `get`, `list`, `search` and `delete` with their own error type.
#[async_trait]
pub trait EntityClient<T: Entity>: Send + Sync {
    /// The collection-specific error type.
    type Error: Send + Sync;

    /// Access the inner generic client.
    fn inner(&self) -> &CollectionClient<T>;

    /// Map store errors to the collection-specific error type.
    fn map_error(e: StoreError) -> Self::Error;

    /// Fetch a record by id; `None` on a miss.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// The whole collection.
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list().await.map_err(Self::map_error)
    }

    #[tracing::instrument(skip(self))]
    async fn search(&self, query: SearchQuery<T::Filter>) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().search(query).await.map_err(Self::map_error)
    }

    /// Delete a record by id. Absent ids are ignored.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
