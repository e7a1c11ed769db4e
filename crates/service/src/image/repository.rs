use async_trait::async_trait;

use super::domain::{Image, NewImage};
use crate::errors::RepositoryError;

/// Repository abstraction for image metadata.
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn find_image(&self, image_id: i32) -> Result<Option<Image>, RepositoryError>;
    async fn list_images(&self, product_id: i32) -> Result<Vec<Image>, RepositoryError>;
    async fn create_image(&self, new: NewImage) -> Result<Image, RepositoryError>;
    async fn delete_image(&self, image_id: i32) -> Result<(), RepositoryError>;
    /// Returns the number of rows removed.
    async fn delete_images_for_product(&self, product_id: i32) -> Result<u64, RepositoryError>;
}
