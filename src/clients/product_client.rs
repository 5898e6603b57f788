//! # Product Client
//!
//! Provides a high-level API for interacting with the `Product` actor.
//! It wraps a `CollectionClient<Product>` and exposes catalog and stock methods.

use crate::framework::{CollectionClient, EntityClient, StoreError};
use crate::model::{Product, ProductCreate, ProductId, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: CollectionClient<Product>,
}

impl ProductClient {
    pub fn new(inner: CollectionClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl EntityClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &CollectionClient<Product> {
        &self.inner
    }

    fn map_error(e: StoreError) -> Self::Error {
        e.into()
    }
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn create_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        Ok(self.inner.create(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_product(
        &self,
        id: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductError> {
        debug!("Sending request");
        Ok(self.inner.update(id, update).await?)
    }

    /// Current stock level of a product.
    #[instrument(skip(self))]
    pub async fn check_stock(&self, id: ProductId) -> Result<u32, ProductError> {
        match self.inner.perform_action(id, ProductAction::CheckStock).await? {
            ProductActionResult::CheckStock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Moves `quantity` units from stock to sold. Returns the remaining stock.
    #[instrument(skip(self))]
    pub async fn record_sale(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        debug!(%id, quantity, "Recording sale");
        match self
            .inner
            .perform_action(id, ProductAction::RecordSale(quantity))
            .await?
        {
            ProductActionResult::RecordSale(left) => Ok(left),
            other => Err(unexpected(other)),
        }
    }

    /// Adds `quantity` units to stock. Returns the new stock level.
    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        match self
            .inner
            .perform_action(id, ProductAction::Restock(quantity))
            .await?
        {
            ProductActionResult::Restock(level) => Ok(level),
            other => Err(unexpected(other)),
        }
    }

    /// Distinct team names, sorted.
    #[instrument(skip(self))]
    pub async fn teams(&self) -> Result<Vec<String>, ProductError> {
        let mut teams: Vec<String> = self.list().await?.into_iter().map(|p| p.team).collect();
        teams.sort();
        teams.dedup();
        Ok(teams)
    }
}

fn unexpected(result: ProductActionResult) -> ProductError {
    ProductError::ActorCommunicationError(format!("unexpected action result {result:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{create_mock_client, expect_action, MockClient};
    use crate::framework::SearchQuery;
    use crate::model::ProductFilter;

    fn product(id: u64, team: &str) -> Product {
        Product::new(
            ProductId(id),
            ProductCreate {
                name: format!("{team} Home"),
                team: team.into(),
                price: 4000.0,
                stock: 4,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_check_stock_returns_correct_level() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let check_task = tokio::spawn(async move { product_client.check_stock(ProductId(1)).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, ProductId(1));
        assert_eq!(action, ProductAction::CheckStock);

        responder.send(Ok(ProductActionResult::CheckStock(42))).unwrap();

        assert_eq!(check_task.await.unwrap().unwrap(), 42);
    }

    #[tokio::test]
    async fn test_record_sale_insufficient_stock_keeps_error_type() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let product_client = ProductClient::new(client);

        let sale_task = tokio::spawn(async move { product_client.record_sale(ProductId(1), 100).await });

        let (_, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(action, ProductAction::RecordSale(100));

        let refusal = ProductError::InsufficientStock {
            requested: 100,
            available: 3,
        };
        responder
            .send(Err(StoreError::EntityError(Box::new(refusal.clone()))))
            .unwrap();

        assert_eq!(sale_task.await.unwrap(), Err(refusal));
    }

    #[tokio::test]
    async fn test_update_miss_maps_to_not_found() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_update(ProductId(99))
            .return_err(StoreError::NotFound("99".into()));

        let client = ProductClient::new(mock.client());
        let result = client
            .update_product(ProductId(99), ProductUpdate::default())
            .await;

        assert_eq!(result, Err(ProductError::NotFound("99".into())));
        mock.verify();
    }

    #[tokio::test]
    async fn test_teams_sorted_and_distinct() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_list().return_ok(vec![
            product(1, "Italy"),
            product(2, "Brazil"),
            product(3, "Italy"),
        ]);

        let client = ProductClient::new(mock.client());
        assert_eq!(client.teams().await.unwrap(), vec!["Brazil", "Italy"]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_search_passes_results_through() {
        let mut mock = MockClient::<Product>::new();
        mock.expect_search().return_ok(vec![product(2, "Brazil")]);

        let client = ProductClient::new(mock.client());
        let query = SearchQuery::new().text("brazil").filter(ProductFilter::InStock);
        let hits = client.search(query).await.unwrap();

        assert_eq!(hits.len(), 1);
        mock.verify();
    }
}
