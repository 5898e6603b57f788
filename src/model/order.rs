/// Represents a placed order.
///
/// # Collection
/// This struct implements the [`Entity`](crate::framework::Entity) trait,
/// allowing it to be managed by a [`CollectionActor`](crate::framework::CollectionActor).
///
/// See [`impl Entity for Order`](#impl-Entity-for-Order) for details on:
/// - Creation parameters ([`OrderCreate`])
/// - Update parameters ([`OrderUpdate`])
use crate::model::{Address, ProductSnapshot, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Orders (`ORD-<unix millis>`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub const PREFIX: &'static str = "ORD-";

    pub fn from_millis(millis: i64) -> Self {
        Self(format!("{}{}", Self::PREFIX, millis))
    }

    /// The timestamp part, if the id has the usual shape.
    pub fn millis(&self) -> Option<i64> {
        self.0.strip_prefix(Self::PREFIX)?.parse().ok()
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display language for status labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

/// Order progress.
///
/// Stored as lowercase English keys. Blobs written with the Russian display
/// strings still load through the serde aliases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    #[serde(alias = "Ожидает")]
    Pending,
    #[serde(alias = "Обрабатывается")]
    Processing,
    #[serde(alias = "Отправлен")]
    Shipped,
    #[serde(alias = "Доставлен")]
    Delivered,
    #[serde(alias = "Выполнен")]
    Completed,
    #[serde(alias = "Отменён", alias = "Отменен")]
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// The canonical storage key.
    pub fn key(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, OrderStatus::Pending) => "Pending",
            (Locale::En, OrderStatus::Processing) => "Processing",
            (Locale::En, OrderStatus::Shipped) => "Shipped",
            (Locale::En, OrderStatus::Delivered) => "Delivered",
            (Locale::En, OrderStatus::Completed) => "Completed",
            (Locale::En, OrderStatus::Cancelled) => "Cancelled",
            (Locale::Ru, OrderStatus::Pending) => "Ожидает",
            (Locale::Ru, OrderStatus::Processing) => "Обрабатывается",
            (Locale::Ru, OrderStatus::Shipped) => "Отправлен",
            (Locale::Ru, OrderStatus::Delivered) => "Доставлен",
            (Locale::Ru, OrderStatus::Completed) => "Выполнен",
            (Locale::Ru, OrderStatus::Cancelled) => "Отменён",
        }
    }

    pub fn is_cancelled(self) -> bool {
        self == OrderStatus::Cancelled
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown order status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    /// Accepts storage keys and both display vocabularies, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| {
                status.key() == needle
                    || status.label(Locale::En).to_lowercase() == needle
                    || status.label(Locale::Ru).to_lowercase() == needle
            })
            .or_else(|| (needle == "отменен").then_some(OrderStatus::Cancelled))
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// One purchased (product, size, quantity) line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: ProductSnapshot,
    pub size: String,
    pub quantity: u32,
    /// Price at the time of purchase.
    pub unit_price: f64,
}

impl OrderLine {
    pub fn total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// `None` for guest checkouts.
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub items: Vec<OrderLine>,
    pub total: f64,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(id: OrderId, params: OrderCreate) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: params.user_id,
            items: params.input.items,
            total: params.input.total,
            status: OrderStatus::Pending,
            address: params.input.address,
            payment_method: params.input.payment_method,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }
}

/// What a shopper submits at checkout. The owner is filled in by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderInput {
    pub items: Vec<OrderLine>,
    /// Grand total including shipping and tax.
    pub total: f64,
    pub address: Address,
    pub payment_method: String,
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: Option<UserId>,
    pub input: OrderInput,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub address: Option<Address>,
    pub payment_method: Option<String>,
}

impl OrderUpdate {
    pub fn status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderFilter {
    Status(OrderStatus),
    User(UserId),
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            OrderFilter::Status(status) => order.status == *status,
            OrderFilter::User(user_id) => order.user_id == Some(*user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reads_both_vocabularies() {
        let legacy: OrderStatus = serde_json::from_str(r#""Отправлен""#).unwrap();
        assert_eq!(legacy, OrderStatus::Shipped);
        let canonical: OrderStatus = serde_json::from_str(r#""cancelled""#).unwrap();
        assert_eq!(canonical, OrderStatus::Cancelled);
        assert_eq!(serde_json::to_string(&legacy).unwrap(), r#""shipped""#);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Delivered".parse::<OrderStatus>(), Ok(OrderStatus::Delivered));
        assert_eq!("выполнен".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        assert_eq!("Отменен".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("lost".parse::<OrderStatus>().is_err());
        for status in OrderStatus::ALL {
            assert_eq!(status.label(Locale::Ru).parse::<OrderStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_order_id_millis() {
        assert_eq!(OrderId::from_millis(1700000000123).millis(), Some(1700000000123));
        assert_eq!(OrderId::from("legacy").millis(), None);
    }
}
