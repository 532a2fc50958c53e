//! Product service - CRUD over product records.
//!
//! Thin orchestration: generic query parameters are translated into the
//! store's native shape and handed to the repository; there are no business
//! rules beyond store constraints.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{NewProduct, Product, ProductUpdate};
use crate::errors::{AppResult, OptionExt};
use crate::infra::ProductRepository;
use crate::types::{Paginated, QueryParams, StoreQuery};

/// Product service trait for dependency injection
#[async_trait]
pub trait ProductService: Send + Sync {
    /// List products for the given pagination/sort/filter parameters
    async fn find_many(&self, params: QueryParams) -> AppResult<Paginated<Product>>;

    /// Get product by id, or NotFound
    async fn find_one(&self, id: i32) -> AppResult<Product>;

    /// Create a new product
    async fn create(&self, product: NewProduct) -> AppResult<Product>;

    /// Apply a partial update, or NotFound
    async fn update(&self, id: i32, update: ProductUpdate) -> AppResult<Product>;

    /// Delete a product, or NotFound
    async fn remove(&self, id: i32) -> AppResult<()>;
}

/// Concrete implementation of ProductService
pub struct ProductManager {
    repo: Arc<dyn ProductRepository>,
}

impl ProductManager {
    /// Create new product service instance with an injected store
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ProductService for ProductManager {
    async fn find_many(&self, params: QueryParams) -> AppResult<Paginated<Product>> {
        let query = StoreQuery::from(params);

        let data = self.repo.find_many(&query).await?;
        let total = self.repo.count(&query).await?;

        Ok(Paginated::new(data, query.offset, query.limit, total))
    }

    async fn find_one(&self, id: i32) -> AppResult<Product> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn create(&self, product: NewProduct) -> AppResult<Product> {
        self.repo.create(product).await
    }

    async fn update(&self, id: i32, update: ProductUpdate) -> AppResult<Product> {
        self.repo.update(id, update).await
    }

    async fn remove(&self, id: i32) -> AppResult<()> {
        self.repo.delete(id).await
    }
}
