/// Represents a registered customer or staff account.
///
/// # Collection
/// This struct implements the [`Entity`](crate::framework::Entity) trait,
/// allowing it to be managed by a [`CollectionActor`](crate::framework::CollectionActor).
///
/// See [`impl Entity for User`](#impl-Entity-for-User) for details on:
/// - Creation parameters ([`UserCreate`])
/// - Update parameters ([`UserUpdate`])
/// - Custom actions ([`UserAction`](crate::user_actor::UserAction))
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl From<u64> for UserId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Customer,
    Manager,
    Admin,
}

impl Role {
    /// Managers and admins may manage the catalog and orders.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    Banned,
}

/// A delivery address, either saved on a user or attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub label: String,
    pub city: String,
    pub street: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    pub fn new(city: impl Into<String>, street: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            street: street.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    pub email: bool,
    pub sms: bool,
    pub promotions: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            promotions: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub status: UserStatus,
    #[serde(default = "Utc::now")]
    pub joined_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub notifications: NotificationPreferences,
    /// PHC-format password hash. Absent for accounts without a password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}

impl User {
    pub fn new(id: UserId, params: UserCreate) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: params.name,
            email: params.email,
            phone: params.phone,
            role: params.role,
            status: UserStatus::Active,
            joined_at: now,
            updated_at: now,
            last_login: None,
            addresses: params.addresses,
            notifications: NotificationPreferences::default(),
            password_hash: params.password_hash,
        }
    }

    /// The record with the password hash removed, for client-side copies.
    pub fn without_secrets(self) -> Self {
        Self {
            password_hash: None,
            ..self
        }
    }

    pub fn default_address(&self) -> Option<&Address> {
        self.addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| self.addresses.first())
    }
}

/// Payload for creating a new user.
#[derive(Clone, Default)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub addresses: Vec<Address>,
    pub password_hash: Option<String>,
}

// Create payloads show up in request logs; the hash must not.
impl std::fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCreate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .field("addresses", &self.addresses)
            .field("has_password", &self.password_hash.is_some())
            .finish()
    }
}

/// Shallow-merge update for a user. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub addresses: Option<Vec<Address>>,
    pub notifications: Option<NotificationPreferences>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserFilter {
    Role(Role),
    Status(UserStatus),
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::Role(role) => user.role == *role,
            UserFilter::Status(status) => user.status == *status,
        }
    }
}

/// Per-user aggregates computed from the orders collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct UserStats {
    pub orders_count: usize,
    /// Sum of non-cancelled order totals.
    pub total_spent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_debug_hides_hash() {
        let params = UserCreate {
            email: "olga@example.com".into(),
            password_hash: Some("$argon2id$v=19$secret".into()),
            ..Default::default()
        };
        let shown = format!("{params:?}");
        assert!(shown.contains("olga@example.com"));
        assert!(!shown.contains("argon2id"));
    }

    #[test]
    fn test_old_blobs_default_update_time() {
        let raw = r#"{"id":7,"name":"Anna","email":"anna@example.com"}"#;
        let user: User = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, UserId(7));
        assert!(user.updated_at <= Utc::now());
    }
}
