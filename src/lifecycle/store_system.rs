use crate::admin::AdminConsole;
use crate::api::MockApi;
use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::config::StoreConfig;
use crate::context::auth::validate_password;
use crate::context::{AuthError, Cart, CredentialVerifier, Session, Toasts, Wishlist};
use crate::framework::EntityClient;
use crate::model::{UserId, UserStatus};
use crate::storage::{FileStore, KeyValueStore, StorageError};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Runs the three collection actors and hands out everything built on them.
///
/// # Architecture
///
/// - **User Actor**: accounts (no dependencies)
/// - **Product Actor**: catalog and stock (no dependencies)
/// - **Order Actor**: orders, records sales through the Product actor
///
/// # Example
///
/// ```ignore
/// let system = StoreSystem::start(Arc::new(MemoryStore::new()), &StoreConfig::default());
/// let mut session = system.session(Arc::new(Argon2Verifier));
/// session.register(registration).await?;
/// drop(session);
/// system.shutdown().await?;
/// ```
pub struct StoreSystem {
    pub product_client: ProductClient,
    pub user_client: UserClient,
    pub order_client: OrderClient,
    storage: Arc<dyn KeyValueStore>,
    config: StoreConfig,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Failed to open storage: {0}")]
    Storage(#[from] StorageError),
    #[error("Actor task failed: {0}")]
    ActorFailed(#[from] tokio::task::JoinError),
}

impl StoreSystem {
    /// Spawns the actors over `storage`. Must be called inside a Tokio runtime.
    pub fn start(storage: Arc<dyn KeyValueStore>, config: &StoreConfig) -> Self {
        let buffer = config.actor_buffer;

        // 1. Create actors
        let (user_actor, user_client) = crate::user_actor::new(buffer, storage.clone());
        let (product_actor, product_client) = crate::product_actor::new(buffer, storage.clone());
        let (order_actor, order_client) = crate::order_actor::new(buffer, storage.clone());

        // 2. Start actors with injected context
        let user_handle = tokio::spawn(user_actor.run(()));
        let product_handle = tokio::spawn(product_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(product_client.clone()));

        info!(buffer, "Store system started");
        Self {
            product_client,
            user_client,
            order_client,
            storage,
            config: config.clone(),
            // Order first: it holds a ProductClient until it stops.
            handles: vec![order_handle, user_handle, product_handle],
        }
    }

    /// Starts the system on a [`FileStore`] in `config.data_dir`.
    pub async fn open(config: &StoreConfig) -> Result<Self, SystemError> {
        let storage = FileStore::open(config.data_dir.clone()).await?;
        info!(dir = %config.data_dir.display(), "Opened file store");
        Ok(Self::start(Arc::new(storage), config))
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn storage(&self) -> Arc<dyn KeyValueStore> {
        self.storage.clone()
    }

    /// An anonymous session; call `restore` on it to resume a stored one.
    pub fn session(&self, verifier: Arc<dyn CredentialVerifier>) -> Session {
        Session::new(
            self.storage.clone(),
            self.user_client.clone(),
            self.order_client.clone(),
            verifier,
            self.config.admin_marker().map(str::to_string),
        )
    }

    pub async fn cart(&self) -> Cart {
        Cart::load(self.storage.clone(), self.config.pricing).await
    }

    pub async fn wishlist(&self) -> Wishlist {
        Wishlist::load(self.storage.clone()).await
    }

    pub fn toasts(&self) -> Toasts {
        Toasts::new(self.config.toast_duration())
    }

    pub fn api(&self) -> MockApi {
        MockApi::new(
            self.product_client.clone(),
            self.user_client.clone(),
            self.order_client.clone(),
            self.config.api_delay(),
        )
    }

    /// A back-office console acting as `actor`.
    pub fn admin(&self, actor: UserId) -> AdminConsole {
        AdminConsole::new(
            actor,
            self.product_client.clone(),
            self.user_client.clone(),
            self.order_client.clone(),
            self.config.low_stock_threshold,
        )
    }

    /// Gives every active staff account without a password the hash of
    /// `password`. Seeded staff accounts ship without one, so this is how
    /// they first become able to sign in. Returns how many were updated.
    #[instrument(skip_all)]
    pub async fn provision_staff_passwords(
        &self,
        password: &str,
        verifier: &dyn CredentialVerifier,
    ) -> Result<usize, AuthError> {
        validate_password(password)?;
        let pending: Vec<_> = self
            .user_client
            .list()
            .await?
            .into_iter()
            .filter(|u| u.role.is_staff() && u.status == UserStatus::Active && u.password_hash.is_none())
            .collect();
        for user in &pending {
            let hash = verifier.hash_password(password)?;
            self.user_client.set_password_hash(user.id, hash).await?;
            info!(user_id = %user.id, email = %user.email, "Staff password provisioned");
        }
        Ok(pending.len())
    }

    /// Stops every actor once its last client is gone.
    ///
    /// Sessions, API handles and consoles hold client clones: drop them
    /// before calling this, or the matching actor keeps running.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down store...");

        drop(self.order_client);
        drop(self.user_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(e.into());
            }
        }

        info!("Store shutdown complete.");
        Ok(())
    }
}
