//! # Mock Clients
//!
//! Test doubles that stand in for a [`CollectionActor`](super::CollectionActor)
//! so client and context logic can be tested without a running collection.
//!
//! | | `MockClient` | Real actor |
//! |---|---|---|
//! | **State** | none, scripted replies | real map + persistence |
//! | **Use case** | logic *around* a client | the actor itself, full system |
//! | **Error injection** | `return_err` | needs specific state |
//!
//! Two styles are available:
//!
//! - [`MockClient`]: queue expectations up front, hand out the client, then
//!   [`verify`](MockClient::verify) that every expectation was consumed.
//! - [`create_mock_client`] + `expect_*` helpers: receive the raw request,
//!   inspect its payload and answer it by hand.
//!
//! Compiled for unit tests and behind the `testing` feature.

use crate::framework::{CollectionClient, CollectionRequest, Entity, StoreError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

/// A scripted reply for the next request.
enum Expectation<T: Entity> {
    Get(Result<Option<T>, StoreError>),
    List(Result<Vec<T>, StoreError>),
    Search(Result<Vec<T>, StoreError>),
    Create(Result<T::Id, StoreError>),
    Update(Result<T, StoreError>),
    Delete(Result<(), StoreError>),
    Action(Result<T::ActionResult, StoreError>),
}

type Expectations<T> = Arc<Mutex<VecDeque<(Option<<T as Entity>::Id>, Expectation<T>)>>>;

/// A mock collection with ordered expectations.
///
/// # Example
/// ```ignore
/// let mut mock = MockClient::<User>::new();
/// mock.expect_get(UserId(1)).return_ok(Some(user));
/// let client = UserClient::new(mock.client());
/// // exercise client...
/// mock.verify();
/// ```
pub struct MockClient<T: Entity> {
    client: CollectionClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: Entity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> MockClient<T> {
    /// Creates a mock with no expectations. Must be called inside a Tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<CollectionRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();
                let Some((expected_id, expectation)) = next else {
                    panic!("Unexpected request: {request:?}");
                };

                match (request, expectation) {
                    (CollectionRequest::Get { id, respond_to }, Expectation::Get(response)) => {
                        check_id::<T>(&expected_id, &id);
                        let _ = respond_to.send(response);
                    }
                    (CollectionRequest::List { respond_to }, Expectation::List(response)) => {
                        let _ = respond_to.send(response);
                    }
                    (CollectionRequest::Search { respond_to, .. }, Expectation::Search(response)) => {
                        let _ = respond_to.send(response);
                    }
                    (CollectionRequest::Create { respond_to, .. }, Expectation::Create(response)) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Update { id, respond_to, .. },
                        Expectation::Update(response),
                    ) => {
                        check_id::<T>(&expected_id, &id);
                        let _ = respond_to.send(response);
                    }
                    (CollectionRequest::Delete { id, respond_to }, Expectation::Delete(response)) => {
                        check_id::<T>(&expected_id, &id);
                        let _ = respond_to.send(response);
                    }
                    (
                        CollectionRequest::Action { id, respond_to, .. },
                        Expectation::Action(response),
                    ) => {
                        check_id::<T>(&expected_id, &id);
                        let _ = respond_to.send(response);
                    }
                    (request, _) => panic!("Request does not match expectation: {request:?}"),
                }
            }
        });

        Self {
            client: CollectionClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// The client to hand to the code under test.
    pub fn client(&self) -> CollectionClient<T> {
        self.client.clone()
    }

    pub fn expect_get(&mut self, id: T::Id) -> ExpectationBuilder<T, Option<T>> {
        self.builder(Some(id), Expectation::Get)
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(None, Expectation::List)
    }

    pub fn expect_search(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(None, Expectation::Search)
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(None, Expectation::Create)
    }

    pub fn expect_update(&mut self, id: T::Id) -> ExpectationBuilder<T, T> {
        self.builder(Some(id), Expectation::Update)
    }

    pub fn expect_delete(&mut self, id: T::Id) -> ExpectationBuilder<T, ()> {
        self.builder(Some(id), Expectation::Delete)
    }

    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(Some(id), Expectation::Action)
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining > 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }

    fn builder<R>(
        &self,
        id: Option<T::Id>,
        wrap: fn(Result<R, StoreError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            id,
            wrap,
            expectations: self.expectations.clone(),
        }
    }
}

/// Completes an expectation with its scripted reply.
pub struct ExpectationBuilder<T: Entity, R> {
    id: Option<T::Id>,
    wrap: fn(Result<R, StoreError>) -> Expectation<T>,
    expectations: Expectations<T>,
}

impl<T: Entity, R> ExpectationBuilder<T, R> {
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: StoreError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, StoreError>) {
        let expectation = (self.wrap)(response);
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.id, expectation));
    }
}

fn check_id<T: Entity>(expected: &Option<T::Id>, actual: &T::Id) {
    if let Some(expected) = expected {
        assert_eq!(expected, actual, "request addressed the wrong record");
    }
}

// =============================================================================
// RAW CHANNEL HELPERS
// =============================================================================

/// A client whose requests arrive on the returned receiver.
///
/// Use it when the test needs to look inside a payload (e.g. which action
/// was sent) before answering.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (CollectionClient<T>, mpsc::Receiver<CollectionRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CollectionClient::new(sender), receiver)
}

/// Next request, if it is a Create.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Create, oneshot::Sender<Result<T::Id, StoreError>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next request, if it is a Get.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, StoreError>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an Action.
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, StoreError>>,
)> {
    match receiver.recv().await {
        Some(CollectionRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Next request, if it is an Update.
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<CollectionRequest<T>>,
) -> Option<(T::Id, T::Update, oneshot::Sender<Result<T, StoreError>>)> {
    match receiver.recv().await {
        Some(CollectionRequest::Update {
            id,
            update,
            respond_to,
        }) => Some((id, update, respond_to)),
        _ => None,
    }
}
