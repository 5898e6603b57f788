//! Session, cart and wishlist behavior across restarts.

use jersey_store::config::StoreConfig;
use jersey_store::context::{
    AcceptAnyPassword, Argon2Verifier, AuthError, Credential, Registration, SessionState,
    WishlistToggle,
};
use jersey_store::framework::EntityClient;
use jersey_store::lifecycle::StoreSystem;
use jersey_store::model::{ProductId, Role, UserUpdate};
use jersey_store::storage::{keys, KeyValueStore, MemoryStore};
use std::sync::Arc;

fn start(store: &Arc<MemoryStore>) -> StoreSystem {
    let config = StoreConfig {
        api_delay_ms: 0,
        ..Default::default()
    };
    StoreSystem::start(store.clone(), &config)
}

fn registration(email: &str, password: &str) -> Registration {
    Registration {
        name: "Olga".into(),
        email: email.into(),
        phone: Some("+7 900 000-00-00".into()),
        password: password.into(),
    }
}

#[tokio::test]
async fn test_login_provisions_unknown_email() {
    let store = Arc::new(MemoryStore::new());
    let system = start(&store);
    let mut session = system.session(Arc::new(AcceptAnyPassword));

    assert_eq!(session.state(), &SessionState::Anonymous);
    let user = session
        .login(Credential::new("new.fan@example.com", "whatever"))
        .await
        .unwrap();

    assert!(session.is_authenticated());
    assert!(session.token().is_some());
    assert_eq!(user.name, "new.fan");
    assert_eq!(user.role, Role::Customer);
    assert!(user.last_login.is_some());
    assert_eq!(user.password_hash, None);

    // Signing in again finds the same account.
    let again = session
        .login(Credential::new("NEW.FAN@example.com", "other"))
        .await
        .unwrap();
    assert_eq!(again.id, user.id);
    assert_eq!(system.user_client.list().await.unwrap().len(), 4);

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_register_rules() {
    let store = Arc::new(MemoryStore::new());
    let system = start(&store);
    let mut session = system.session(Arc::new(AcceptAnyPassword));

    let taken = session
        .register(registration("Ivan.Petrov@example.com", "secret1"))
        .await;
    assert!(matches!(taken, Err(AuthError::EmailTaken(_))));
    assert!(!session.is_authenticated());

    let short = session.register(registration("olga@example.com", "123")).await;
    assert!(matches!(short, Err(AuthError::Validation(_))));

    let olga = session
        .register(registration("olga@example.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(olga.role, Role::Customer);
    assert_eq!(olga.phone.as_deref(), Some("+7 900 000-00-00"));

    session.logout().await;
    let admin = session
        .register(registration("shop.admin@example.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(admin.role, Role::Admin);

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_session_survives_restart_until_logout() {
    let store = Arc::new(MemoryStore::new());

    let system = start(&store);
    let mut session = system.session(Arc::new(AcceptAnyPassword));
    let user = session
        .login(Credential::new("ivan.petrov@example.com", "x"))
        .await
        .unwrap();
    let token = session.token().map(str::to_string);
    drop(session);
    system.shutdown().await.unwrap();

    let system = start(&store);
    let mut session = system.session(Arc::new(AcceptAnyPassword));
    assert!(session.restore().await);
    assert_eq!(session.current_user().map(|u| u.id), Some(user.id));
    assert_eq!(session.token().map(str::to_string), token);

    session.logout().await;
    assert!(!session.is_authenticated());
    assert_eq!(store.get(keys::CURRENT_USER).await.unwrap(), None);
    assert_eq!(store.get(keys::AUTH_TOKEN).await.unwrap(), None);

    let mut fresh = system.session(Arc::new(AcceptAnyPassword));
    assert!(!fresh.restore().await);

    drop(session);
    drop(fresh);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unreadable_session_restores_anonymous() {
    let store = Arc::new(MemoryStore::new());
    store.set(keys::CURRENT_USER, "not a user").await.unwrap();
    store.set(keys::AUTH_TOKEN, "\"abc\"").await.unwrap();

    let system = start(&store);
    let mut session = system.session(Arc::new(AcceptAnyPassword));
    assert!(!session.restore().await);
    assert_eq!(session.state(), &SessionState::Anonymous);

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_profile_update_cannot_escalate() {
    let store = Arc::new(MemoryStore::new());
    let system = start(&store);
    let mut session = system.session(Arc::new(AcceptAnyPassword));

    assert!(matches!(
        session.update_profile(UserUpdate::default()).await,
        Err(AuthError::NotAuthenticated)
    ));

    session
        .login(Credential::new("ivan.petrov@example.com", "x"))
        .await
        .unwrap();
    let updated = session
        .update_profile(UserUpdate {
            name: Some("Ivan P.".into()),
            role: Some(Role::Admin),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(updated.name, "Ivan P.");
    assert_eq!(updated.role, Role::Customer);
    assert_eq!(session.current_user().map(|u| u.name.as_str()), Some("Ivan P."));

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_argon2_password_flow() {
    let store = Arc::new(MemoryStore::new());
    let system = start(&store);
    let mut session = system.session(Arc::new(Argon2Verifier));

    session
        .register(registration("olga@example.com", "correct horse"))
        .await
        .unwrap();
    session.logout().await;

    let wrong = session
        .login(Credential::new("olga@example.com", "wrong horse"))
        .await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    assert!(!session.is_authenticated());

    let unknown = session
        .login(Credential::new("nobody@example.com", "correct horse"))
        .await;
    assert!(matches!(unknown, Err(AuthError::InvalidCredentials)));

    let user = session
        .login(Credential::new("olga@example.com", "correct horse"))
        .await
        .unwrap();
    assert_eq!(user.email, "olga@example.com");

    // The persisted session never carries the hash.
    let raw = store.get(keys::CURRENT_USER).await.unwrap().unwrap();
    assert!(!raw.contains("argon2"));

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_change_password() {
    let store = Arc::new(MemoryStore::new());
    let system = start(&store);
    let mut session = system.session(Arc::new(Argon2Verifier));

    let anonymous = session.change_password("correct horse", "battery staple").await;
    assert!(matches!(anonymous, Err(AuthError::NotAuthenticated)));

    session
        .register(registration("olga@example.com", "correct horse"))
        .await
        .unwrap();
    let wrong = session.change_password("wrong horse", "battery staple").await;
    assert!(matches!(wrong, Err(AuthError::InvalidCredentials)));
    let short = session.change_password("correct horse", "12345").await;
    assert!(matches!(short, Err(AuthError::Validation(_))));

    session
        .change_password("correct horse", "battery staple")
        .await
        .unwrap();
    session.logout().await;

    let old = session
        .login(Credential::new("olga@example.com", "correct horse"))
        .await;
    assert!(matches!(old, Err(AuthError::InvalidCredentials)));
    session
        .login(Credential::new("olga@example.com", "battery staple"))
        .await
        .unwrap();

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_seeded_staff_sign_in_after_provisioning() {
    let store = Arc::new(MemoryStore::new());
    let system = start(&store);
    let mut session = system.session(Arc::new(Argon2Verifier));

    let before = session
        .login(Credential::new("admin@retrojersey.shop", "staff-pass"))
        .await;
    assert!(matches!(before, Err(AuthError::InvalidCredentials)));

    let short = system.provision_staff_passwords("123", &Argon2Verifier).await;
    assert!(matches!(short, Err(AuthError::Validation(_))));

    // Admin and manager; the seeded customer is left alone.
    assert_eq!(system.provision_staff_passwords("staff-pass", &Argon2Verifier).await.unwrap(), 2);
    assert_eq!(system.provision_staff_passwords("other-pass", &Argon2Verifier).await.unwrap(), 0);

    let admin = session
        .login(Credential::new("admin@retrojersey.shop", "staff-pass"))
        .await
        .unwrap();
    assert_eq!(admin.role, Role::Admin);

    drop(session);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cart_and_wishlist_restore_after_restart() {
    let store = Arc::new(MemoryStore::new());

    let system = start(&store);
    let brazil = system.product_client.get(ProductId(2)).await.unwrap().unwrap();
    let mut cart = system.cart().await;
    cart.add_item(brazil.snapshot(), "M", 1).await.unwrap();
    cart.add_item(brazil.snapshot(), "M", 2).await.unwrap();
    cart.add_item(brazil.snapshot(), "XL", 1).await.unwrap();
    let mut wishlist = system.wishlist().await;
    assert_eq!(wishlist.toggle(brazil.snapshot()).await, WishlistToggle::Added);
    system.shutdown().await.unwrap();

    let system = start(&store);
    let cart = system.cart().await;
    let wishlist_after = system.wishlist().await;

    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.item_count(), 4);
    assert_eq!(cart.subtotal(), 4.0 * brazil.price);
    assert!(cart.contains(ProductId(2)));
    assert!(wishlist_after.contains(ProductId(2)));
    assert_eq!(wishlist_after.len(), wishlist.len());

    system.shutdown().await.unwrap();
}
