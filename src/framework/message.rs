//! # Collection Messages
//!
//! Requests sent from a [`CollectionClient`](super::CollectionClient) to its
//! [`CollectionActor`](super::CollectionActor).

use crate::framework::entity::Entity;
use crate::framework::error::StoreError;
use crate::framework::search::SearchQuery;
use tokio::sync::oneshot;

/// One-shot reply channel carried by every request.
pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

/// The CRUD + search + action vocabulary of a collection.
///
/// Generic over `T: Entity`, so each variant carries that entity's own
/// payload types and a product update can never be sent to the user actor.
#[derive(Debug)]
pub enum CollectionRequest<T: Entity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Search {
        query: SearchQuery<T::Filter>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
