use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::{NewProduct, Product};
use crate::errors::RepositoryError;
use crate::validation::product::ProductField;

/// Repository abstraction for product persistence.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_product(&self, id: i32) -> Result<Option<Product>, RepositoryError>;
    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError>;
    async fn create_product(&self, new: NewProduct) -> Result<Product, RepositoryError>;
    /// Apply `fields` and set `date_last_updated` to `touched_at`, even when `fields` is empty.
    async fn update_product(&self, id: i32, fields: Vec<ProductField>, touched_at: DateTime<Utc>) -> Result<(), RepositoryError>;
    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError>;
}
