//! Storefront walkthrough: register, fill a cart, check out, print the dashboard.
//!
//! Usage: `jersey-store [config.toml]`
//!
//! Set `STAFF_PASSWORD` to give the seeded staff accounts a password on
//! startup; accounts that already have one are left alone.

use jersey_store::config::StoreConfig;
use jersey_store::context::{Argon2Verifier, Registration, ToastKind, WishlistToggle};
use jersey_store::framework::{EntityClient, SearchQuery};
use jersey_store::lifecycle::{setup_tracing, StoreSystem};
use jersey_store::model::{Address, ProductFilter};
use std::sync::Arc;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    let system = StoreSystem::open(&config).await?;
    let toasts = system.toasts();

    if let Ok(password) = std::env::var("STAFF_PASSWORD") {
        let provisioned = system.provision_staff_passwords(&password, &Argon2Verifier).await?;
        info!(provisioned, "Staff accounts ready");
    }

    let mut session = system.session(Arc::new(Argon2Verifier));
    if !session.restore().await {
        let registration = Registration {
            name: "Demo Admin".to_string(),
            email: format!("demo.admin+{}@example.com", uuid::Uuid::new_v4().simple()),
            phone: None,
            password: "retro-1986".to_string(),
        };
        let user = session
            .register(registration)
            .instrument(tracing::info_span!("registration"))
            .await?;
        info!(user_id = %user.id, role = ?user.role, "Registered demo account");
    }

    let query = SearchQuery::new()
        .text("home")
        .filter(ProductFilter::InStock)
        .filter(ProductFilter::MaxPrice(5500.0));
    let hits = system.product_client.search(query).await?;
    info!(hits = hits.len(), "Catalog search");

    let mut cart = system.cart().await;
    let mut wishlist = system.wishlist().await;
    for product in hits.iter().take(2) {
        if cart.add_item(product.snapshot(), "L", 1).await.is_some() {
            toasts.enqueue(ToastKind::Cart, Some("Cart"), format!("{} added", product.name));
        }
    }
    if let Some(product) = hits.last() {
        if wishlist.toggle(product.snapshot()).await == WishlistToggle::Added {
            toasts.enqueue(ToastKind::Wishlist, None, format!("{} saved", product.name));
        }
    }
    let summary = cart.summary();
    info!(
        subtotal = summary.subtotal,
        shipping = summary.shipping,
        tax = summary.tax,
        total = summary.total,
        "Cart summary"
    );

    let address = Address::new("Saint Petersburg", "Nevsky prospekt 28");
    match cart.checkout(&mut session, address, "card").await {
        Ok(order_id) => {
            toasts.success(format!("Order {order_id} placed"));
            let stats = session.stats().await?;
            info!(%order_id, orders = stats.orders_count, spent = stats.total_spent, "Checked out");
        }
        Err(e) => {
            toasts.error(e.to_string());
            warn!(error = %e, "Checkout failed");
        }
    }

    if let Some(user_id) = session.current_user().map(|user| user.id) {
        match system.admin(user_id).dashboard().await {
            Ok(dashboard) => info!(?dashboard, "Dashboard"),
            Err(e) => warn!(error = %e, "Dashboard unavailable"),
        }
    }

    let teams = system.api().get("/team").await?;
    info!(%teams, "Teams");
    info!(active = toasts.active().len(), "Notifications");

    drop(session);
    system.shutdown().await?;
    Ok(())
}
