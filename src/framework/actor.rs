//! # Collection Actor
//!
//! The single writer of one collection. It owns the records in a map keyed by
//! id, processes requests one at a time, and writes the whole collection back
//! to the key-value store after every mutation.
//!
//! Because only this task ever touches the collection, two concurrent
//! mutations are applied in arrival order and both survive; the store never
//! sees interleaved read-modify-write cycles.

use crate::framework::client::CollectionClient;
use crate::framework::entity::Entity;
use crate::framework::error::StoreError;
use crate::framework::message::CollectionRequest;
use crate::storage::{self, keys, KeyValueStore};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Server half of a collection.
///
/// # Usage Pattern
///
/// 1. **Create**: `CollectionActor::new()` returns the actor and its client.
/// 2. **Wire**: pass dependencies (other clients) into `actor.run(context)`.
/// 3. **Run**: spawn the run loop on a Tokio task.
///
/// # Loading & Seeding
///
/// Before serving the first request the actor reads `T::COLLECTION` from the
/// store. A missing key, a value that does not parse, or an empty array all
/// fall back to [`Entity::seed`], which is written straight back. Parse
/// failures are logged and never reach a caller.
///
/// The highest id ever issued is kept under its own key, so a deleted id is
/// never handed out again, across restarts too.
pub struct CollectionActor<T: Entity> {
    receiver: mpsc::Receiver<CollectionRequest<T>>,
    storage: Arc<dyn KeyValueStore>,
    store: HashMap<T::Id, T>,
    last_issued: Option<T::Id>,
}

impl<T: Entity> CollectionActor<T> {
    /// Creates the actor and its client.
    ///
    /// `buffer_size` is the request channel capacity; callers wait when it is full.
    pub fn new(buffer_size: usize, storage: Arc<dyn KeyValueStore>) -> (Self, CollectionClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            storage,
            store: HashMap::new(),
            last_issued: None,
        };
        (actor, CollectionClient::new(sender))
    }

    /// Loads the collection, then processes requests until every client is dropped.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = entity_type::<T>();
        self.load(entity_type).await;
        info!(entity_type, size = self.store.len(), "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CollectionRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::next_id(&self.store, self.last_issued.as_ref());

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ = respond_to.send(Err(StoreError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            self.last_issued = Some(id.clone());
                            self.persist(entity_type).await;
                            self.persist_last_issued(entity_type).await;
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(StoreError::EntityError(Box::new(e))));
                        }
                    }
                }
                CollectionRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                CollectionRequest::List { respond_to } => {
                    debug!(entity_type, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.sorted(|_| true)));
                }
                CollectionRequest::Search { query, respond_to } => {
                    let hits = self.sorted(|item| query.matches(item));
                    debug!(entity_type, ?query, hits = hits.len(), "Search");
                    let _ = respond_to.send(Ok(hits));
                }
                CollectionRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    };
                    // Merge into a copy so a rejected update leaves the record untouched.
                    let mut merged = item.clone();
                    if let Err(e) = merged.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(StoreError::EntityError(Box::new(e))));
                        continue;
                    }
                    *item = merged.clone();
                    self.persist(entity_type).await;
                    info!(entity_type, %id, "Updated");
                    let _ = respond_to.send(Ok(merged));
                }
                CollectionRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        debug!(entity_type, %id, "Delete of absent record ignored");
                        let _ = respond_to.send(Ok(()));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(StoreError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    self.persist(entity_type).await;
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                CollectionRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(StoreError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| StoreError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => {
                            self.persist(entity_type).await;
                            info!(entity_type, %id, "Action ok");
                        }
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn load(&mut self, entity_type: &str) {
        let loaded = match self.storage.get(T::COLLECTION).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) if !items.is_empty() => Some(items),
                Ok(_) => {
                    debug!(entity_type, "Stored collection is empty");
                    None
                }
                Err(e) => {
                    warn!(entity_type, error = %e, "Stored collection unreadable");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(entity_type, error = %e, "Storage read failed");
                None
            }
        };

        let (items, seeded) = match loaded {
            Some(items) => (items, false),
            None => (T::seed(), true),
        };
        self.store = items
            .into_iter()
            .map(|item| (item.id().clone(), item))
            .collect();

        if seeded {
            info!(entity_type, size = self.store.len(), "Seeded defaults");
            self.persist(entity_type).await;
        }

        let key = keys::last_issued(T::COLLECTION);
        let stored = match storage::load_typed::<T::Id>(self.storage.as_ref(), &key).await {
            Ok(stored) => stored,
            Err(e) => {
                warn!(entity_type, error = %e, "Storage read failed");
                None
            }
        };
        self.last_issued = stored.into_iter().chain(self.store.keys().cloned()).max();
    }

    /// Writes the whole collection. Failures are logged and the in-memory
    /// state stays authoritative.
    async fn persist(&self, entity_type: &str) {
        let items = self.sorted(|_| true);
        let raw = match serde_json::to_string(&items) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(entity_type, error = %e, "Serialize failed, collection not persisted");
                return;
            }
        };
        if let Err(e) = self.storage.set(T::COLLECTION, &raw).await {
            warn!(entity_type, error = %e, "Storage write failed");
        }
    }

    async fn persist_last_issued(&self, entity_type: &str) {
        let Some(id) = &self.last_issued else {
            return;
        };
        let key = keys::last_issued(T::COLLECTION);
        if let Err(e) = storage::save_typed(self.storage.as_ref(), &key, id).await {
            warn!(entity_type, error = %e, "Storage write failed");
        }
    }

    fn sorted(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        let mut items: Vec<T> = self.store.values().filter(|&item| keep(item)).cloned().collect();
        items.sort_by(|a, b| a.id().cmp(b.id()));
        items
    }
}

/// Short type name for log fields ("Product" rather than the full path).
fn entity_type<T>() -> &'static str {
    std::any::type_name::<T>()
        .rsplit("::")
        .next()
        .unwrap_or("Unknown")
}
