use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use super::domain::{blob_key, Image, NewImage};
use super::repository::ImageRepository;
use crate::auth::Authorizer;
use crate::blob::BlobStore;
use crate::errors::ServiceError;
use crate::product::domain::Product;
use crate::product::repository::ProductRepository;
use crate::request::RequestEnvelope;
use crate::response::Outcome;
use crate::validation::{self, upload::{self, Attachment, ImageUpload}, Rejection};

/// Image orchestrator.
///
/// Create uploads the payload before inserting the record; delete removes the
/// payload before the record. Each two-phase section runs on its own task, so a
/// client disconnect cannot stop it halfway. A failure between the phases is
/// logged as an orphan risk and never compensated automatically.
pub struct ImageService {
    products: Arc<dyn ProductRepository>,
    images: Arc<dyn ImageRepository>,
    blobs: Arc<dyn BlobStore>,
    authorizer: Arc<Authorizer>,
}

impl ImageService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        images: Arc<dyn ImageRepository>,
        blobs: Arc<dyn BlobStore>,
        authorizer: Arc<Authorizer>,
    ) -> Self {
        Self { products, images, blobs, authorizer }
    }

    /// `attachments` carries the multipart parts, or the reason they could not be read;
    /// either way it is only looked at after ownership is settled.
    #[instrument(skip(self, env, attachments))]
    pub async fn create(
        &self,
        env: &RequestEnvelope,
        raw_product_id: &str,
        attachments: Result<Vec<Attachment>, Rejection>,
    ) -> Result<Outcome<Image>, ServiceError> {
        validation::check_upload(env)?;
        let product_id = validation::parse_id(raw_product_id)?;
        let principal = self.authorizer.authenticate(env).await?;
        let product = self.product(product_id).await?;
        Authorizer::ensure_owner(&principal, &product)?;

        let upload = upload::validate_attachments(attachments?)?;
        let key = blob_key(principal.id, product_id, &upload.file_name);

        let task = tokio::spawn(store_image(self.blobs.clone(), self.images.clone(), product_id, key, upload));
        let image = task.await??;
        info!(image_id = image.image_id, product_id, blob_key = %image.s3_bucket_path, "image_created");
        Ok(Outcome::Created(image))
    }

    /// Metadata only; the blob store is not consulted.
    #[instrument(skip(self, env))]
    pub async fn list(&self, env: &RequestEnvelope, raw_product_id: &str) -> Result<Outcome<Vec<Image>>, ServiceError> {
        validation::check_read(env)?;
        let product_id = validation::parse_id(raw_product_id)?;
        self.product(product_id).await?;
        Ok(Outcome::Ok(self.images.list_images(product_id).await?))
    }

    #[instrument(skip(self, env))]
    pub async fn get(&self, env: &RequestEnvelope, raw_product_id: &str, raw_image_id: &str) -> Result<Outcome<Image>, ServiceError> {
        validation::check_read(env)?;
        let product_id = validation::parse_id(raw_product_id)?;
        let image_id = validation::parse_id(raw_image_id)?;
        self.product(product_id).await?;
        Ok(Outcome::Ok(self.scoped_image(product_id, image_id).await?))
    }

    #[instrument(skip(self, env))]
    pub async fn delete(&self, env: &RequestEnvelope, raw_product_id: &str, raw_image_id: &str) -> Result<Outcome<()>, ServiceError> {
        validation::check_bodyless(env)?;
        let product_id = validation::parse_id(raw_product_id)?;
        let image_id = validation::parse_id(raw_image_id)?;
        let principal = self.authorizer.authenticate(env).await?;
        let product = self.product(product_id).await?;
        Authorizer::ensure_owner(&principal, &product)?;
        let image = self.scoped_image(product_id, image_id).await?;

        let task = tokio::spawn(remove_image(self.blobs.clone(), self.images.clone(), image));
        task.await??;
        info!(image_id, product_id, owner = principal.id, "image_deleted");
        Ok(Outcome::NoContent)
    }

    async fn product(&self, id: i32) -> Result<Product, ServiceError> {
        self.products.find_product(id).await?.ok_or(ServiceError::NotFound("product"))
    }

    /// An image id that exists under another product is reported as missing.
    async fn scoped_image(&self, product_id: i32, image_id: i32) -> Result<Image, ServiceError> {
        match self.images.find_image(image_id).await? {
            Some(image) if image.product_id == product_id => Ok(image),
            _ => Err(ServiceError::NotFound("image")),
        }
    }
}

async fn store_image(
    blobs: Arc<dyn BlobStore>,
    images: Arc<dyn ImageRepository>,
    product_id: i32,
    key: String,
    upload: ImageUpload,
) -> Result<Image, ServiceError> {
    if let Err(e) = blobs.put(&key, upload.bytes, upload.format.mime()).await {
        warn!(product_id, blob_key = %key, error = %e, "blob upload failed; no record written");
        return Err(e.into());
    }
    let new = NewImage { product_id, file_name: upload.file_name, s3_bucket_path: key.clone() };
    images.create_image(new).await.map_err(|e| {
        error!(product_id, blob_key = %key, error = %e, "orphan risk: blob stored without image record");
        e.into()
    })
}

async fn remove_image(blobs: Arc<dyn BlobStore>, images: Arc<dyn ImageRepository>, image: Image) -> Result<(), ServiceError> {
    if let Err(e) = blobs.delete(&image.s3_bucket_path).await {
        error!(product_id = image.product_id, image_id = image.image_id, blob_key = %image.s3_bucket_path, error = %e, "blob delete failed; image record kept");
        return Err(e.into());
    }
    images.delete_image(image.image_id).await.map_err(|e| {
        error!(product_id = image.product_id, image_id = image.image_id, blob_key = %image.s3_bucket_path, error = %e, "orphan risk: image record references deleted blob");
        e.into()
    })
}
