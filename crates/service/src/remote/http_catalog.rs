use std::time::Duration;

use async_trait::async_trait;
use common::api::ApiClient;
use models::{Product, ProductId, Stock};
use tracing::instrument;

use crate::cart::ports::{ProductCatalog, StockService};
use crate::errors::ServiceError;

/// Catalog and stock lookups against the storefront API:
/// `GET /products/{id}` and `GET /stock/{id}`.
#[derive(Clone, Debug)]
pub struct HttpCatalog {
    client: ApiClient,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ServiceError> {
        Ok(Self { client: ApiClient::new(base_url, timeout)? })
    }

    pub fn from_client(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProductCatalog for HttpCatalog {
    #[instrument(skip(self))]
    async fn product(&self, id: ProductId) -> Result<Product, ServiceError> {
        Ok(self.client.get_json(&format!("/products/{id}")).await?)
    }
}

#[async_trait]
impl StockService for HttpCatalog {
    #[instrument(skip(self))]
    async fn stock(&self, id: ProductId) -> Result<Stock, ServiceError> {
        Ok(self.client.get_json(&format!("/stock/{id}")).await?)
    }
}
