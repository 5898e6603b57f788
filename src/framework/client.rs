//! # Collection Client
//!
//! The cloneable, typed handle callers use to reach a collection actor.

use crate::framework::entity::Entity;
use crate::framework::error::StoreError;
use crate::framework::message::{CollectionRequest, Response};
use crate::framework::search::SearchQuery;
use tokio::sync::{mpsc, oneshot};

/// Sends CRUD + search + action requests to a
/// [`CollectionActor`](super::CollectionActor) and awaits the reply.
///
/// Holds only a channel sender, so cloning is cheap. The actor shuts down once
/// every clone has been dropped.
pub struct CollectionClient<T: Entity> {
    sender: mpsc::Sender<CollectionRequest<T>>,
}

impl<T: Entity> Clone for CollectionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Entity> CollectionClient<T> {
    pub fn new(sender: mpsc::Sender<CollectionRequest<T>>) -> Self {
        Self { sender }
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, StoreError> {
        self.call(|respond_to| CollectionRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, StoreError> {
        self.call(|respond_to| CollectionRequest::Get { id, respond_to })
            .await
    }

    /// Every record, ordered by id.
    pub async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.call(|respond_to| CollectionRequest::List { respond_to })
            .await
    }

    pub async fn search(&self, query: SearchQuery<T::Filter>) -> Result<Vec<T>, StoreError> {
        self.call(|respond_to| CollectionRequest::Search { query, respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, StoreError> {
        self.call(|respond_to| CollectionRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    /// Removes a record. Deleting an absent id succeeds.
    pub async fn delete(&self, id: T::Id) -> Result<(), StoreError> {
        self.call(|respond_to| CollectionRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, StoreError> {
        self.call(|respond_to| CollectionRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(Response<R>) -> CollectionRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::ActorClosed)?;
        response.await.map_err(|_| StoreError::ActorDropped)?
    }
}
