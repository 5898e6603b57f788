//! # User Client
//!
//! Provides a high-level API for interacting with the `User` actor.
//! It wraps a `CollectionClient<User>` and exposes account methods.

use crate::framework::{CollectionClient, EntityClient, SearchQuery, StoreError};
use crate::model::{User, UserCreate, UserId, UserUpdate};
use crate::user_actor::{UserAction, UserActionResult, UserError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

/// Client for interacting with the User actor.
#[derive(Clone)]
pub struct UserClient {
    inner: CollectionClient<User>,
}

impl UserClient {
    pub fn new(inner: CollectionClient<User>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EntityClient<User> for UserClient {
    type Error = UserError;

    fn inner(&self) -> &CollectionClient<User> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        e.into()
    }
}

impl UserClient {
    #[instrument(skip(self, params), fields(email = %params.email, role = ?params.role))]
    pub async fn create_user(&self, params: UserCreate) -> Result<UserId, UserError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, UserError> {
        debug!("Sending request");
        Ok(self.inner.update(id, update).await?)
    }

    /// First user whose email matches, ignoring case.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let needle = email.trim().to_lowercase();
        let candidates = self.inner.search(SearchQuery::new().text(needle.clone())).await?;
        Ok(candidates
            .into_iter()
            .find(|user| user.email.to_lowercase() == needle))
    }

    #[instrument(skip(self))]
    pub async fn record_login(&self, id: UserId) -> Result<DateTime<Utc>, UserError> {
        match self.inner.perform_action(id, UserAction::RecordLogin).await? {
            UserActionResult::RecordLogin(at) => Ok(at),
            other => Err(unexpected(other)),
        }
    }

    /// Stores a new password hash for `id`.
    #[instrument(skip(self, hash))]
    pub async fn set_password_hash(&self, id: UserId, hash: String) -> Result<(), UserError> {
        match self.inner.perform_action(id, UserAction::SetPasswordHash(hash)).await? {
            UserActionResult::PasswordSet => Ok(()),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(result: UserActionResult) -> UserError {
    UserError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;

    fn user(id: u64, email: &str) -> User {
        User::new(
            UserId(id),
            UserCreate {
                name: "Anna".into(),
                email: email.into(),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case_and_partial_hits() {
        let mut mock = MockClient::<User>::new();
        mock.expect_search().return_ok(vec![
            user(1, "anna.k@example.com"),
            user(2, "Anna@Example.com"),
        ]);

        let client = UserClient::new(mock.client());
        let found = client.find_by_email(" anna@example.com ").await.unwrap();

        assert_eq!(found.map(|u| u.id), Some(UserId(2)));
        mock.verify();
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut mock = MockClient::<User>::new();
        mock.expect_get(UserId(5)).return_ok(None);

        let client = UserClient::new(mock.client());
        assert_eq!(client.get(UserId(5)).await, Ok(None));
        mock.verify();
    }

    #[tokio::test]
    async fn test_closed_actor_is_communication_error() {
        let mut mock = MockClient::<User>::new();
        mock.expect_create().return_err(StoreError::ActorClosed);

        let client = UserClient::new(mock.client());
        let result = client.create_user(UserCreate::default()).await;

        assert!(matches!(result, Err(UserError::ActorCommunicationError(_))));
        mock.verify();
    }
}
