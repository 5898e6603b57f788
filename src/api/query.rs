//! Query-string parsing for the mock API routes.

use super::error::ApiError;
use crate::framework::SearchQuery;
use crate::model::{OrderFilter, OrderStatus, Product, ProductFilter, ProductStatus, UserId};
use std::collections::HashMap;
use std::str::FromStr;

/// Decoded `key=value` pairs. Later duplicates win.
#[derive(Debug, Default)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn parse(query: &str) -> Self {
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .filter(|(_, value)| !value.trim().is_empty())
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|value| value.trim())
    }

    fn parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>, ApiError> {
        self.get(key)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| ApiError::BadRequest(format!("{key}={raw}")))
            })
            .transpose()
    }

    fn flag(&self, key: &str) -> Result<bool, ApiError> {
        match self.get(key) {
            None | Some("false") | Some("0") => Ok(false),
            Some("true") | Some("1") => Ok(true),
            Some(other) => Err(ApiError::BadRequest(format!("{key}={other}"))),
        }
    }
}

/// Listing order for `/products?sort=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSort {
    PriceAsc,
    PriceDesc,
    Rating,
    Newest,
    Popular,
}

impl ProductSort {
    fn parse(raw: &str) -> Result<Self, ApiError> {
        match raw {
            "price_asc" => Ok(ProductSort::PriceAsc),
            "price_desc" => Ok(ProductSort::PriceDesc),
            "rating" => Ok(ProductSort::Rating),
            "newest" => Ok(ProductSort::Newest),
            "popular" => Ok(ProductSort::Popular),
            other => Err(ApiError::BadRequest(format!("sort={other}"))),
        }
    }

    pub fn apply(self, products: &mut [Product]) {
        match self {
            ProductSort::PriceAsc => products.sort_by(|a, b| a.price.total_cmp(&b.price)),
            ProductSort::PriceDesc => products.sort_by(|a, b| b.price.total_cmp(&a.price)),
            ProductSort::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            ProductSort::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            ProductSort::Popular => products.sort_by(|a, b| b.sold.cmp(&a.sold)),
        }
    }
}

fn product_status(raw: &str) -> Result<ProductStatus, ApiError> {
    match raw.to_lowercase().as_str() {
        "active" => Ok(ProductStatus::Active),
        "inactive" => Ok(ProductStatus::Inactive),
        "draft" => Ok(ProductStatus::Draft),
        _ => Err(ApiError::BadRequest(format!("status={raw}"))),
    }
}

/// `/products` parameters as a search plus an optional sort.
pub fn product_query(params: &Params) -> Result<(SearchQuery<ProductFilter>, Option<ProductSort>), ApiError> {
    let mut query = SearchQuery::new();
    if let Some(text) = params.get("search") {
        query = query.text(text);
    }
    if let Some(category) = params.get("category") {
        query = query.filter(ProductFilter::Category(category.to_string()));
    }
    if let Some(team) = params.get("team") {
        query = query.filter(ProductFilter::Team(team.to_string()));
    }
    if let Some(status) = params.get("status") {
        query = query.filter(ProductFilter::Status(product_status(status)?));
    }
    if let Some(min) = params.parsed::<f64>("minPrice")? {
        query = query.filter(ProductFilter::MinPrice(min));
    }
    if let Some(max) = params.parsed::<f64>("maxPrice")? {
        query = query.filter(ProductFilter::MaxPrice(max));
    }
    if params.flag("inStock")? {
        query = query.filter(ProductFilter::InStock);
    }
    if params.flag("featured")? {
        query = query.filter(ProductFilter::Featured);
    }
    if let Some(rating) = params.parsed::<f32>("minRating")? {
        query = query.filter(ProductFilter::MinRating(rating));
    }
    if let Some(size) = params.get("size") {
        query = query.filter(ProductFilter::Size(size.to_string()));
    }
    let sort = params.get("sort").map(ProductSort::parse).transpose()?;
    Ok((query, sort))
}

/// `/orders` parameters.
pub fn order_query(params: &Params) -> Result<SearchQuery<OrderFilter>, ApiError> {
    let mut query = SearchQuery::new();
    if let Some(user_id) = params.parsed::<u64>("userId")? {
        query = query.filter(OrderFilter::User(UserId(user_id)));
    }
    if let Some(status) = params.get("status") {
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        query = query.filter(OrderFilter::Status(status));
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_decode_and_skip_blanks() {
        let params = Params::parse("search=milan%201989&team=&category=Clubs+only");
        assert_eq!(params.get("search"), Some("milan 1989"));
        assert_eq!(params.get("team"), None);
        assert_eq!(params.get("category"), Some("Clubs only"));
    }

    #[test]
    fn test_product_query_filters() {
        let params = Params::parse("minPrice=1000&maxPrice=5000&inStock=true&sort=price_desc");
        let (query, sort) = product_query(&params).unwrap();
        assert_eq!(
            query.filters,
            vec![
                ProductFilter::MinPrice(1000.0),
                ProductFilter::MaxPrice(5000.0),
                ProductFilter::InStock
            ]
        );
        assert_eq!(sort, Some(ProductSort::PriceDesc));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(matches!(
            product_query(&Params::parse("minPrice=cheap")),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            product_query(&Params::parse("sort=random")),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            order_query(&Params::parse("status=lost")),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_order_query_accepts_legacy_status() {
        let query = order_query(&Params::parse("userId=3&status=%D0%9E%D1%82%D0%BF%D1%80%D0%B0%D0%B2%D0%BB%D0%B5%D0%BD")).unwrap();
        assert_eq!(
            query.filters,
            vec![
                OrderFilter::User(UserId(3)),
                OrderFilter::Status(OrderStatus::Shipped)
            ]
        );
    }
}
