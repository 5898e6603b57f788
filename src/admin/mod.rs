//! # Admin Back-Office
//!
//! Catalog, account and order management for staff. Every operation first
//! re-reads the acting account: it must exist, be active and hold the role.
//! Managers and admins may manage the catalog and orders, only admins may
//! manage accounts.

use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::context::auth::{validate_password, AuthError, CredentialVerifier};
use crate::framework::EntityClient;
use crate::model::{
    Order, OrderId, OrderStatus, Product, ProductCreate, ProductId, ProductStatus, ProductUpdate,
    Role, User, UserId, UserStatus, UserUpdate,
};
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// How many products the dashboard lists as top sellers.
pub const TOP_SELLERS: usize = 5;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("{user} ({role:?}) may not {action}")]
    Forbidden {
        user: UserId,
        role: Role,
        action: &'static str,
    },
    #[error("Unknown user {0}")]
    UnknownActor(UserId),
    #[error("Account {user} is {status:?}")]
    AccountDisabled { user: UserId, status: UserStatus },
    #[error("Admins cannot demote or ban themselves")]
    SelfLockout,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Order(#[from] OrderError),
}

/// Store-wide numbers for the dashboard page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub product_count: usize,
    pub active_products: usize,
    /// Products at or below the low-stock threshold, lowest stock first.
    pub low_stock: Vec<ProductId>,
    pub user_count: usize,
    pub order_count: usize,
    /// Sum of non-cancelled order totals.
    pub revenue: f64,
    /// Best sellers by units sold.
    pub top_sellers: Vec<ProductId>,
}

impl Dashboard {
    pub fn compute(products: &[Product], users: &[User], orders: &[Order], low_stock_threshold: u32) -> Self {
        let mut low: Vec<&Product> = products
            .iter()
            .filter(|p| p.status == ProductStatus::Active && p.stock <= low_stock_threshold)
            .collect();
        low.sort_by_key(|p| (p.stock, p.id));

        let mut by_sold: Vec<&Product> = products.iter().collect();
        by_sold.sort_by(|a, b| b.sold.cmp(&a.sold).then(a.id.cmp(&b.id)));

        Self {
            product_count: products.len(),
            active_products: products
                .iter()
                .filter(|p| p.status == ProductStatus::Active)
                .count(),
            low_stock: low.into_iter().map(|p| p.id).collect(),
            user_count: users.len(),
            order_count: orders.len(),
            revenue: orders
                .iter()
                .filter(|o| !o.status.is_cancelled())
                .map(|o| o.total)
                .sum(),
            top_sellers: by_sold.into_iter().take(TOP_SELLERS).map(|p| p.id).collect(),
        }
    }
}

/// Staff operations, on behalf of `actor`.
///
/// The acting account is looked up again before every operation, so a ban
/// or demotion takes effect on consoles that are already open.
pub struct AdminConsole {
    actor: UserId,
    products: ProductClient,
    users: UserClient,
    orders: OrderClient,
    low_stock_threshold: u32,
}

#[derive(Debug, Clone, Copy)]
enum Access {
    Staff,
    Admin,
}

impl AdminConsole {
    pub fn new(
        actor: UserId,
        products: ProductClient,
        users: UserClient,
        orders: OrderClient,
        low_stock_threshold: u32,
    ) -> Self {
        Self {
            actor,
            products,
            users,
            orders,
            low_stock_threshold,
        }
    }

    pub fn actor(&self) -> UserId {
        self.actor
    }

    #[instrument(skip(self), fields(actor = %self.actor))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, AdminError> {
        self.authorize(Access::Staff, "create products").await?;
        let id = self.products.create_product(params).await?;
        info!(%id, "Product created");
        Ok(id)
    }

    #[instrument(skip(self), fields(actor = %self.actor))]
    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, AdminError> {
        self.authorize(Access::Staff, "update products").await?;
        Ok(self.products.update_product(id, update).await?)
    }

    #[instrument(skip(self), fields(actor = %self.actor))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), AdminError> {
        self.authorize(Access::Staff, "delete products").await?;
        self.products.delete(id).await?;
        info!(%id, "Product deleted");
        Ok(())
    }

    /// Returns the new stock level.
    #[instrument(skip(self), fields(actor = %self.actor))]
    pub async fn restock(&self, id: ProductId, quantity: u32) -> Result<u32, AdminError> {
        self.authorize(Access::Staff, "restock products").await?;
        Ok(self.products.restock(id, quantity).await?)
    }

    #[instrument(skip(self), fields(actor = %self.actor))]
    pub async fn set_user_status(&self, id: UserId, status: UserStatus) -> Result<User, AdminError> {
        self.authorize(Access::Admin, "change account status").await?;
        if id == self.actor && status != UserStatus::Active {
            return Err(AdminError::SelfLockout);
        }
        let update = UserUpdate {
            status: Some(status),
            ..Default::default()
        };
        Ok(self.users.update_user(id, update).await?.without_secrets())
    }

    #[instrument(skip(self), fields(actor = %self.actor))]
    pub async fn set_user_role(&self, id: UserId, role: Role) -> Result<User, AdminError> {
        self.authorize(Access::Admin, "change roles").await?;
        if id == self.actor && role != Role::Admin {
            return Err(AdminError::SelfLockout);
        }
        let update = UserUpdate {
            role: Some(role),
            ..Default::default()
        };
        Ok(self.users.update_user(id, update).await?.without_secrets())
    }

    /// Sets a new password on any account, e.g. a seeded staff account that
    /// was created without one.
    #[instrument(skip(self, password, verifier), fields(actor = %self.actor))]
    pub async fn reset_password(
        &self,
        id: UserId,
        password: &str,
        verifier: &dyn CredentialVerifier,
    ) -> Result<(), AdminError> {
        self.authorize(Access::Admin, "reset passwords").await?;
        validate_password(password)?;
        let hash = verifier.hash_password(password)?;
        self.users.set_password_hash(id, hash).await?;
        info!(%id, "Password reset");
        Ok(())
    }

    #[instrument(skip(self), fields(actor = %self.actor))]
    pub async fn set_order_status(&self, id: OrderId, status: OrderStatus) -> Result<Order, AdminError> {
        self.authorize(Access::Staff, "update orders").await?;
        Ok(self.orders.update_status(id, status).await?)
    }

    #[instrument(skip(self), fields(actor = %self.actor))]
    pub async fn dashboard(&self) -> Result<Dashboard, AdminError> {
        self.authorize(Access::Staff, "view the dashboard").await?;
        let products = self.products.list().await?;
        let users = self.users.list().await?;
        let orders = self.orders.list().await?;
        Ok(Dashboard::compute(&products, &users, &orders, self.low_stock_threshold))
    }

    /// Fetches the acting account and checks it is active and holds the role.
    async fn authorize(&self, access: Access, action: &'static str) -> Result<User, AdminError> {
        let Some(user) = self.users.get(self.actor).await? else {
            warn!(user_id = %self.actor, action, "Unknown acting user");
            return Err(AdminError::UnknownActor(self.actor));
        };
        if user.status != UserStatus::Active {
            warn!(user_id = %user.id, status = ?user.status, action, "Account disabled");
            return Err(AdminError::AccountDisabled {
                user: user.id,
                status: user.status,
            });
        }
        let allowed = match access {
            Access::Staff => user.role.is_staff(),
            Access::Admin => user.role == Role::Admin,
        };
        if !allowed {
            warn!(user_id = %user.id, role = ?user.role, action, "Forbidden");
            return Err(AdminError::Forbidden {
                user: user.id,
                role: user.role,
                action,
            });
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::MockClient;
    use crate::context::AcceptAnyPassword;
    use crate::model::{Address, OrderCreate, OrderInput, UserCreate};
    use crate::user_actor::UserActionResult;

    fn user(role: Role) -> User {
        User::new(
            UserId(1),
            UserCreate {
                name: "Staff".into(),
                email: "staff@shop.ru".into(),
                role,
                ..Default::default()
            },
        )
    }

    fn product(id: u64, stock: u32, sold: u32) -> Product {
        let mut p = Product::new(
            ProductId(id),
            ProductCreate {
                name: format!("Jersey {id}"),
                price: 1000.0,
                stock,
                ..Default::default()
            },
        );
        p.sold = sold;
        p
    }

    fn order(millis: i64, total: f64, status: OrderStatus) -> Order {
        let mut order = Order::new(
            OrderId::from_millis(millis),
            OrderCreate {
                user_id: None,
                input: OrderInput {
                    items: Vec::new(),
                    total,
                    address: Address::new("Omsk", "Lenina 1"),
                    payment_method: "cash".into(),
                },
            },
        );
        order.status = status;
        order
    }

    /// A console for user 1, whose record is looked up once as `acting`.
    fn console_for(
        acting: Option<User>,
    ) -> (AdminConsole, MockClient<Product>, MockClient<User>, MockClient<Order>) {
        let products = MockClient::<Product>::new();
        let mut users = MockClient::<User>::new();
        let orders = MockClient::<Order>::new();
        users.expect_get(UserId(1)).return_ok(acting);
        let console = AdminConsole::new(
            UserId(1),
            ProductClient::new(products.client()),
            UserClient::new(users.client()),
            OrderClient::new(orders.client()),
            5,
        );
        (console, products, users, orders)
    }

    fn console(role: Role) -> (AdminConsole, MockClient<Product>, MockClient<User>, MockClient<Order>) {
        console_for(Some(user(role)))
    }

    #[test]
    fn test_dashboard_compute() {
        let products: Vec<_> = (1..=7).map(|id| product(id, id as u32, 10 * id as u32)).collect();
        let orders = [
            order(1, 1000.0, OrderStatus::Delivered),
            order(2, 700.0, OrderStatus::Cancelled),
            order(3, 300.0, OrderStatus::Pending),
        ];
        let dashboard = Dashboard::compute(&products, &[user(Role::Admin)], &orders, 3);

        assert_eq!(dashboard.product_count, 7);
        assert_eq!(dashboard.low_stock, [1, 2, 3].map(ProductId));
        assert_eq!(dashboard.revenue, 1300.0);
        assert_eq!(dashboard.top_sellers, [7, 6, 5, 4, 3].map(ProductId));
    }

    #[tokio::test]
    async fn test_customer_is_forbidden() {
        let (console, products, _, _) = console(Role::Customer);
        let result = console.restock(ProductId(1), 5).await;
        assert!(matches!(result, Err(AdminError::Forbidden { .. })));
        products.verify();
    }

    #[tokio::test]
    async fn test_manager_cannot_change_roles() {
        let (console, _, users, _) = console(Role::Manager);
        let result = console.set_user_role(UserId(2), Role::Admin).await;
        assert!(matches!(result, Err(AdminError::Forbidden { .. })));
        users.verify();
    }

    #[tokio::test]
    async fn test_admin_cannot_ban_self() {
        let (console, _, users, _) = console(Role::Admin);
        let result = console.set_user_status(UserId(1), UserStatus::Banned).await;
        assert!(matches!(result, Err(AdminError::SelfLockout)));
        users.verify();
    }

    #[tokio::test]
    async fn test_banned_admin_is_rejected() {
        let mut banned = user(Role::Admin);
        banned.status = UserStatus::Banned;
        let (console, products, users, _) = console_for(Some(banned));

        let result = console.delete_product(ProductId(1)).await;
        assert!(matches!(
            result,
            Err(AdminError::AccountDisabled {
                status: UserStatus::Banned,
                ..
            })
        ));
        products.verify();
        users.verify();
    }

    #[tokio::test]
    async fn test_inactive_manager_is_rejected() {
        let mut inactive = user(Role::Manager);
        inactive.status = UserStatus::Inactive;
        let (console, _, users, _) = console_for(Some(inactive));

        let result = console.restock(ProductId(1), 5).await;
        assert!(matches!(result, Err(AdminError::AccountDisabled { .. })));
        users.verify();
    }

    #[tokio::test]
    async fn test_deleted_actor_is_rejected() {
        let (console, products, users, _) = console_for(None);
        let result = console.dashboard().await;
        assert!(matches!(result, Err(AdminError::UnknownActor(UserId(1)))));
        products.verify();
        users.verify();
    }

    #[tokio::test]
    async fn test_admin_resets_password() {
        let (console, _, mut users, _) = console(Role::Admin);
        users
            .expect_action(UserId(2))
            .return_ok(UserActionResult::PasswordSet);

        console
            .reset_password(UserId(2), "new-secret", &AcceptAnyPassword)
            .await
            .unwrap();
        users.verify();
    }

    #[tokio::test]
    async fn test_reset_password_checks_length() {
        let (console, _, users, _) = console(Role::Admin);
        let result = console.reset_password(UserId(2), "123", &AcceptAnyPassword).await;
        assert!(matches!(result, Err(AdminError::Auth(AuthError::Validation(_)))));
        users.verify();
    }

    #[tokio::test]
    async fn test_manager_cannot_reset_passwords() {
        let (console, _, users, _) = console(Role::Manager);
        let result = console.reset_password(UserId(2), "new-secret", &AcceptAnyPassword).await;
        assert!(matches!(result, Err(AdminError::Forbidden { .. })));
        users.verify();
    }

    #[tokio::test]
    async fn test_manager_sets_order_status() {
        let (console, _, _, mut orders) = console(Role::Manager);
        let id = OrderId::from_millis(1);
        orders
            .expect_update(id.clone())
            .return_ok(order(1, 100.0, OrderStatus::Shipped));

        let updated = console.set_order_status(id, OrderStatus::Shipped).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);
        orders.verify();
    }
}
