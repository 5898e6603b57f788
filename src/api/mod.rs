//! # Mock API
//!
//! A REST-shaped read API over the collections, with a fixed artificial
//! delay, for pages written against an HTTP backend that does not exist yet.
//!
//! | Route | Answer |
//! |---|---|
//! | `GET /products?search=&category=&team=&status=&minPrice=&maxPrice=&inStock=&featured=&minRating=&size=&sort=` | product list |
//! | `GET /products/{id}` | one product |
//! | `GET /team` | distinct team names, sorted |
//! | `GET /orders?userId=&status=` | order list |
//! | `GET /orders/{id}` | one order |
//! | `GET /users`, `GET /users/{id}` | users, without password hashes |

pub mod error;
pub mod query;

pub use error::ApiError;

use crate::clients::{OrderClient, ProductClient, UserClient};
use crate::framework::{EntityClient, SearchQuery};
use crate::model::{OrderId, ProductId, User, UserId};
use query::Params;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
pub struct MockApi {
    products: ProductClient,
    users: UserClient,
    orders: OrderClient,
    delay: Duration,
}

impl MockApi {
    pub fn new(products: ProductClient, users: UserClient, orders: OrderClient, delay: Duration) -> Self {
        Self {
            products,
            users,
            orders,
            delay,
        }
    }

    /// Waits for the configured delay, then answers `method path`.
    #[instrument(skip(self))]
    pub async fn request(&self, method: &str, path: &str) -> Result<Value, ApiError> {
        tokio::time::sleep(self.delay).await;
        if !method.eq_ignore_ascii_case("GET") {
            warn!("Unsupported method");
            return Err(ApiError::MethodNotAllowed(format!("{method} {path}")));
        }
        let result = self.route(path).await;
        if let Err(e) = &result {
            debug!(error = %e, "Request failed");
        }
        result
    }

    /// Shorthand for `request("GET", path)`.
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request("GET", path).await
    }

    async fn route(&self, path: &str) -> Result<Value, ApiError> {
        let (route, raw_query) = path.split_once('?').unwrap_or((path, ""));
        let params = Params::parse(raw_query);
        let segments: Vec<&str> = route.split('/').filter(|s| !s.is_empty()).collect();
        let not_found = || ApiError::NotFound(path.to_string());

        match segments.as_slice() {
            ["products"] => {
                let (query, sort) = query::product_query(&params)?;
                let mut products = self.products.search(query).await.map_err(backend)?;
                if let Some(sort) = sort {
                    sort.apply(&mut products);
                }
                to_json(&products)
            }
            ["products", id] => {
                let id = id.parse().map(ProductId).map_err(|_| not_found())?;
                let product = self.products.get(id).await.map_err(backend)?;
                to_json(&product.ok_or_else(not_found)?)
            }
            ["team"] | ["teams"] => to_json(&self.products.teams().await.map_err(backend)?),
            ["orders"] => {
                let query = query::order_query(&params)?;
                let orders = self.orders.search(query).await.map_err(backend)?;
                to_json(&orders)
            }
            ["orders", id] => {
                let order = self
                    .orders
                    .get(OrderId::from(*id))
                    .await
                    .map_err(backend)?;
                to_json(&order.ok_or_else(not_found)?)
            }
            ["users"] => {
                let users = self.users.search(SearchQuery::new()).await.map_err(backend)?;
                let users: Vec<User> = users.into_iter().map(User::without_secrets).collect();
                to_json(&users)
            }
            ["users", id] => {
                let id = id.parse().map(UserId).map_err(|_| not_found())?;
                let user = self.users.get(id).await.map_err(backend)?;
                to_json(&user.ok_or_else(not_found)?.without_secrets())
            }
            _ => Err(not_found()),
        }
    }
}

fn backend(e: impl Display) -> ApiError {
    ApiError::Backend(e.to_string())
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value, ApiError> {
    Ok(serde_json::to_value(value)?)
}
