//! # Session
//!
//! Who is signed in. The identity survives restarts through the
//! `current_user` and `auth_token` keys; orders placed through the session are
//! owned by the signed-in user, or are guest orders when nobody is.

use super::auth::{validate_password, AuthError, Credential, CredentialVerifier, Registration};
use super::{forget, mirror, restore};
use crate::clients::{OrderClient, UserClient};
use crate::framework::EntityClient;
use crate::model::{
    Order, OrderCreate, OrderId, OrderInput, OrderStatus, User, UserCreate, UserId,
    UserStats, UserUpdate,
};
use crate::storage::{keys, KeyValueStore};
use crate::user_actor::UserError;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Anonymous,
    Authenticated { user: User, token: String },
}

pub struct Session {
    storage: Arc<dyn KeyValueStore>,
    users: UserClient,
    orders: OrderClient,
    verifier: Arc<dyn CredentialVerifier>,
    admin_marker: Option<String>,
    state: SessionState,
}

impl Session {
    /// An anonymous session. Call [`restore`](Self::restore) to resume a stored one.
    pub fn new(
        storage: Arc<dyn KeyValueStore>,
        users: UserClient,
        orders: OrderClient,
        verifier: Arc<dyn CredentialVerifier>,
        admin_marker: Option<String>,
    ) -> Self {
        Self {
            storage,
            users,
            orders,
            verifier,
            admin_marker,
            state: SessionState::Anonymous,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated { user, .. } => Some(user),
            SessionState::Anonymous => None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated { token, .. } => Some(token),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    /// Resumes the stored identity when both keys are present and readable.
    /// Returns whether a user is now signed in.
    #[instrument(skip(self))]
    pub async fn restore(&mut self) -> bool {
        let user = restore::<User>(self.storage.as_ref(), keys::CURRENT_USER).await;
        let token = restore::<String>(self.storage.as_ref(), keys::AUTH_TOKEN).await;
        self.state = match (user, token) {
            (Some(user), Some(token)) => {
                info!(user_id = %user.id, "Session restored");
                SessionState::Authenticated { user, token }
            }
            _ => SessionState::Anonymous,
        };
        self.is_authenticated()
    }

    #[instrument(skip(self))]
    pub async fn login(&mut self, credential: Credential) -> Result<User, AuthError> {
        let user = self.verifier.verify(&self.users, &credential).await?;
        self.establish(user).await
    }

    /// Creates an account and signs it in.
    #[instrument(skip(self))]
    pub async fn register(&mut self, registration: Registration) -> Result<User, AuthError> {
        registration.validate()?;
        let email = registration.email.trim().to_string();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken(email));
        }
        let role = registration.role(self.admin_marker.as_deref());
        let password_hash = self.verifier.hash_password(&registration.password)?;
        let id = self
            .users
            .create_user(UserCreate {
                name: registration.name.trim().to_string(),
                email,
                phone: registration.phone.filter(|p| !p.trim().is_empty()),
                role,
                addresses: Vec::new(),
                password_hash: Some(password_hash),
            })
            .await?;
        info!(user_id = %id, ?role, "Registered");
        let user = self.fetch_user(id).await?;
        self.establish(user).await
    }

    #[instrument(skip(self))]
    pub async fn logout(&mut self) {
        if let SessionState::Authenticated { user, .. } = &self.state {
            info!(user_id = %user.id, "Logged out");
        }
        self.state = SessionState::Anonymous;
        forget(self.storage.as_ref(), keys::CURRENT_USER).await;
        forget(self.storage.as_ref(), keys::AUTH_TOKEN).await;
    }

    /// Updates the signed-in user's own profile. Role and status are not
    /// self-service and are ignored.
    #[instrument(skip(self))]
    pub async fn update_profile(&mut self, update: UserUpdate) -> Result<User, AuthError> {
        let user_id = self.require_user()?.id;
        let update = UserUpdate {
            role: None,
            status: None,
            ..update
        };
        let user = self.users.update_user(user_id, update).await?.without_secrets();
        self.set_user(user.clone()).await;
        Ok(user)
    }

    /// Changes the signed-in user's password after checking the current one.
    #[instrument(skip_all)]
    pub async fn change_password(&mut self, current: &str, new: &str) -> Result<(), AuthError> {
        let email = self.require_user()?.email.clone();
        validate_password(new)?;
        let user = self
            .verifier
            .verify(&self.users, &Credential::new(email, current))
            .await?;
        let hash = self.verifier.hash_password(new)?;
        self.users.set_password_hash(user.id, hash).await?;
        info!(user_id = %user.id, "Password changed");
        Ok(())
    }

    /// Places an order for the signed-in user, or a guest order.
    #[instrument(skip(self))]
    pub async fn place_order(&mut self, input: OrderInput) -> Result<OrderId, AuthError> {
        let user_id = self.current_user().map(|user| user.id);
        let id = self.orders.create_order(OrderCreate { user_id, input }).await?;
        if let Some(user_id) = user_id {
            let user = self.fetch_user(user_id).await?;
            self.set_user(user).await;
        }
        Ok(id)
    }

    #[instrument(skip(self))]
    pub async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, AuthError> {
        Ok(self.orders.update_status(id, status).await?)
    }

    /// The signed-in user's orders, newest first. Empty when anonymous.
    pub async fn orders(&self) -> Result<Vec<Order>, AuthError> {
        match self.current_user() {
            Some(user) => Ok(self.orders.for_user(user.id).await?),
            None => Ok(Vec::new()),
        }
    }

    pub async fn stats(&self) -> Result<UserStats, AuthError> {
        match self.current_user() {
            Some(user) => Ok(self.orders.stats_for_user(user.id).await?),
            None => Ok(UserStats::default()),
        }
    }

    fn require_user(&self) -> Result<&User, AuthError> {
        self.current_user().ok_or(AuthError::NotAuthenticated)
    }

    async fn fetch_user(&self, id: UserId) -> Result<User, AuthError> {
        self.users
            .get(id)
            .await?
            .map(User::without_secrets)
            .ok_or_else(|| AuthError::User(UserError::NotFound(id.to_string())))
    }

    async fn establish(&mut self, user: User) -> Result<User, AuthError> {
        self.users.record_login(user.id).await?;
        let user = self.fetch_user(user.id).await?;
        let token = Uuid::new_v4().to_string();
        mirror(self.storage.as_ref(), keys::CURRENT_USER, &user).await;
        mirror(self.storage.as_ref(), keys::AUTH_TOKEN, &token).await;
        info!(user_id = %user.id, "Signed in");
        self.state = SessionState::Authenticated {
            user: user.clone(),
            token,
        };
        Ok(user)
    }

    /// Replaces the signed-in user's record, keeping the token.
    async fn set_user(&mut self, fresh: User) {
        if let SessionState::Authenticated { user, .. } = &mut self.state {
            *user = fresh;
            mirror(self.storage.as_ref(), keys::CURRENT_USER, &*user).await;
        }
    }
}
