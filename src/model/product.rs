/// Represents a jersey in the catalog.
///
/// # Collection
/// This struct implements the [`Entity`](crate::framework::Entity) trait,
/// allowing it to be managed by a [`CollectionActor`](crate::framework::CollectionActor).
///
/// See [`impl Entity for Product`](#impl-Entity-for-Product) for details on:
/// - Creation parameters ([`ProductCreate`])
/// - Update parameters ([`ProductUpdate`])
/// - Custom actions ([`ProductAction`](crate::product_actor::ProductAction))
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog visibility of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
    Draft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub team: String,
    #[serde(default)]
    pub color: String,
    pub price: f64,
    /// Purchase cost, admin only.
    #[serde(default)]
    pub cost: Option<f64>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub sold: u32,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: ProductStatus,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Builds a product from creation parameters, clamping the rating to 0–5.
    pub fn new(id: ProductId, params: ProductCreate) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: params.name,
            team: params.team,
            color: params.color,
            price: params.price,
            cost: params.cost,
            stock: params.stock,
            sold: 0,
            rating: clamp_rating(params.rating),
            category: params.category,
            status: params.status,
            sizes: params.sizes,
            image: params.image,
            featured: params.featured,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// The copy of this product carried by cart lines, wishlist entries and orders.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            team: self.team.clone(),
            price: self.price,
            image: self.image.clone(),
            stock: self.stock,
        }
    }
}

pub(crate) fn clamp_rating(rating: f32) -> f32 {
    if rating.is_nan() {
        0.0
    } else {
        rating.clamp(0.0, 5.0)
    }
}

/// Product fields copied at the moment it enters a cart, wishlist or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub team: String,
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: u32,
}

/// Payload for creating a new product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub team: String,
    pub color: String,
    pub price: f64,
    pub cost: Option<f64>,
    pub stock: u32,
    pub rating: f32,
    pub category: String,
    pub status: ProductStatus,
    pub sizes: Vec<String>,
    pub image: String,
    pub featured: bool,
}

/// Shallow-merge update for a product. `None` leaves the field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub team: Option<String>,
    pub color: Option<String>,
    pub price: Option<f64>,
    pub cost: Option<f64>,
    pub stock: Option<u32>,
    pub rating: Option<f32>,
    pub category: Option<String>,
    pub status: Option<ProductStatus>,
    pub sizes: Option<Vec<String>>,
    pub image: Option<String>,
    pub featured: Option<bool>,
}

/// Typed predicates for product searches. All filters in a query must hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    /// Case-insensitive exact category.
    Category(String),
    /// Case-insensitive exact team.
    Team(String),
    Status(ProductStatus),
    MinPrice(f64),
    MaxPrice(f64),
    InStock,
    Featured,
    MinRating(f32),
    /// Offered in this size (case-insensitive).
    Size(String),
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::Category(category) => {
                product.category.to_lowercase() == category.to_lowercase()
            }
            ProductFilter::Team(team) => product.team.to_lowercase() == team.to_lowercase(),
            ProductFilter::Status(status) => product.status == *status,
            ProductFilter::MinPrice(min) => product.price >= *min,
            ProductFilter::MaxPrice(max) => product.price <= *max,
            ProductFilter::InStock => product.in_stock(),
            ProductFilter::Featured => product.featured,
            ProductFilter::MinRating(min) => product.rating >= *min,
            ProductFilter::Size(size) => {
                product.sizes.iter().any(|s| s.to_lowercase() == size.to_lowercase())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product::new(
            ProductId(1),
            ProductCreate {
                name: "Home Kit 1986".into(),
                team: "Argentina".into(),
                category: "Национальные сборные".into(),
                price: 4990.0,
                stock: 3,
                rating: 7.5,
                sizes: vec!["M".into(), "L".into()],
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_new_clamps_rating() {
        assert_eq!(sample().rating, 5.0);
        assert_eq!(clamp_rating(-1.0), 0.0);
        assert_eq!(clamp_rating(f32::NAN), 0.0);
    }

    #[test]
    fn test_filters() {
        let product = sample();
        assert!(ProductFilter::Category("национальные сборные".into()).matches(&product));
        assert!(ProductFilter::Team("ARGENTINA".into()).matches(&product));
        assert!(ProductFilter::Size("l".into()).matches(&product));
        assert!(!ProductFilter::Size("XL".into()).matches(&product));
        assert!(ProductFilter::MaxPrice(5000.0).matches(&product));
        assert!(!ProductFilter::MinPrice(5000.0).matches(&product));
        assert!(ProductFilter::InStock.matches(&product));
        assert!(!ProductFilter::Featured.matches(&product));
    }

    #[test]
    fn test_old_blobs_default_missing_fields() {
        let raw = r#"{"id":7,"name":"Away","team":"Milan","price":3000}"#;
        let product: Product = serde_json::from_str(raw).unwrap();
        assert_eq!(product.id, ProductId(7));
        assert_eq!(product.status, ProductStatus::Active);
        assert!(product.sizes.is_empty());
        assert!(!product.in_stock());
    }
}
