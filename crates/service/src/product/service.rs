use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, instrument};

use super::domain::{NewProduct, Product};
use super::repository::ProductRepository;
use crate::auth::{Authorizer, Principal};
use crate::errors::ServiceError;
use crate::image::repository::ImageRepository;
use crate::request::RequestEnvelope;
use crate::response::Outcome;
use crate::validation::{self, product as rules, product::ProductField};

/// Product orchestrator independent of web framework
pub struct ProductService {
    products: Arc<dyn ProductRepository>,
    images: Arc<dyn ImageRepository>,
    authorizer: Arc<Authorizer>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductRepository>, images: Arc<dyn ImageRepository>, authorizer: Arc<Authorizer>) -> Self {
        Self { products, images, authorizer }
    }

    #[instrument(skip_all)]
    pub async fn create(&self, env: &RequestEnvelope, body: &[u8]) -> Result<Outcome<Product>, ServiceError> {
        validation::check_write(env)?;
        let principal = self.authorizer.authenticate(env).await?;
        let draft = rules::decode_draft(body)?;
        let product = self
            .products
            .create_product(NewProduct { draft, owner_user_id: principal.id })
            .await?;
        info!(product_id = product.id, owner = principal.id, "product_created");
        Ok(Outcome::Created(product))
    }

    #[instrument(skip(self, env))]
    pub async fn get(&self, env: &RequestEnvelope, raw_id: &str) -> Result<Outcome<Product>, ServiceError> {
        validation::check_read(env)?;
        let id = validation::parse_id(raw_id)?;
        let product = self.products.find_product(id).await?.ok_or(ServiceError::NotFound("product"))?;
        Ok(Outcome::Ok(product))
    }

    #[instrument(skip_all)]
    pub async fn list(&self, env: &RequestEnvelope) -> Result<Outcome<Vec<Product>>, ServiceError> {
        validation::check_read(env)?;
        Ok(Outcome::Ok(self.products.list_products().await?))
    }

    /// Full replacement; every field is required.
    #[instrument(skip(self, env, body))]
    pub async fn replace(&self, env: &RequestEnvelope, raw_id: &str, body: &[u8]) -> Result<Outcome<()>, ServiceError> {
        validation::check_write(env)?;
        let id = validation::parse_id(raw_id)?;
        let (principal, _) = self.owned(env, id).await?;
        let draft = rules::decode_draft(body)?;
        self.apply(&principal, id, draft.into_fields()).await
    }

    /// Partial update; any subset of fields, including none.
    #[instrument(skip(self, env, body))]
    pub async fn patch(&self, env: &RequestEnvelope, raw_id: &str, body: &[u8]) -> Result<Outcome<()>, ServiceError> {
        validation::check_write(env)?;
        let id = validation::parse_id(raw_id)?;
        let (principal, _) = self.owned(env, id).await?;
        let patch = rules::decode_patch(body)?;
        self.apply(&principal, id, patch.0).await
    }

    /// Image records go with the product. Their payloads stay in the blob store and
    /// are reported for reconciliation.
    #[instrument(skip(self, env))]
    pub async fn delete(&self, env: &RequestEnvelope, raw_id: &str) -> Result<Outcome<()>, ServiceError> {
        validation::check_bodyless(env)?;
        let id = validation::parse_id(raw_id)?;
        let (principal, _) = self.owned(env, id).await?;

        let images = self.images.list_images(id).await?;
        let removed = self.images.delete_images_for_product(id).await?;
        for image in &images {
            error!(product_id = id, blob_key = %image.s3_bucket_path, "orphan risk: blob left behind by product delete");
        }
        self.products.delete_product(id).await?;
        info!(product_id = id, owner = principal.id, images_removed = removed, "product_deleted");
        Ok(Outcome::NoContent)
    }

    /// Authenticate, then 404 before 403.
    async fn owned(&self, env: &RequestEnvelope, id: i32) -> Result<(Principal, Product), ServiceError> {
        let principal = self.authorizer.authenticate(env).await?;
        let product = self.products.find_product(id).await?.ok_or(ServiceError::NotFound("product"))?;
        Authorizer::ensure_owner(&principal, &product)?;
        Ok((principal, product))
    }

    async fn apply(&self, principal: &Principal, id: i32, fields: Vec<ProductField>) -> Result<Outcome<()>, ServiceError> {
        let changed = fields.len();
        self.products.update_product(id, fields, Utc::now()).await?;
        info!(product_id = id, owner = principal.id, fields = changed, "product_updated");
        Ok(Outcome::NoContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::domain::NewAccountRecord;
    use crate::account::repository::AccountRepository;
    use crate::auth::{Argon2Hasher, CredentialHasher};
    use crate::image::domain::NewImage;
    use crate::repo::memory::InMemoryRepository;
    use crate::validation::Rejection;

    const LAMP: &[u8] = br#"{"name":"Lamp","description":"Desk lamp","sku":"L-1","manufacturer":"Acme","quantity":50}"#;

    async fn setup() -> (Arc<InMemoryRepository>, ProductService) {
        let repo = Arc::new(InMemoryRepository::default());
        let hasher = Arc::new(Argon2Hasher);
        for who in ["a@example.com", "b@example.com"] {
            repo.create_account(NewAccountRecord {
                first_name: "T".into(),
                last_name: "T".into(),
                username: who.into(),
                password_hash: hasher.hash("secret123").unwrap(),
            })
            .await
            .unwrap();
        }
        let authz = Arc::new(Authorizer::new(repo.clone(), hasher));
        (repo.clone(), ProductService::new(repo.clone(), repo, authz))
    }

    fn as_a() -> RequestEnvelope { RequestEnvelope::basic("a@example.com", "secret123") }
    fn as_b() -> RequestEnvelope { RequestEnvelope::basic("b@example.com", "secret123") }

    async fn create_as_a(svc: &ProductService) -> Product {
        svc.create(&as_a().with_body(), LAMP).await.unwrap().into_body().unwrap()
    }

    #[tokio::test]
    async fn create_sets_owner_to_caller() {
        let (_repo, svc) = setup().await;
        let out = svc.create(&as_a().with_body(), LAMP).await.unwrap();
        assert_eq!(out.status(), 201);
        let product = out.into_body().unwrap();
        assert_eq!(product.owner_user_id, 1);
        assert_eq!(product.quantity, 50);
    }

    #[tokio::test]
    async fn quantity_out_of_range_rejected() {
        let (repo, svc) = setup().await;
        let body = br#"{"name":"Lamp","description":"Desk lamp","sku":"L-1","manufacturer":"Acme","quantity":150}"#;
        let err = svc.create(&as_a().with_body(), body).await.unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(repo.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unauthenticated_create_rejected() {
        let (_repo, svc) = setup().await;
        let err = svc.create(&RequestEnvelope::anonymous().with_body(), LAMP).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthenticated));
    }

    #[tokio::test]
    async fn non_owner_patch_is_forbidden_but_missing_is_not_found() {
        let (_repo, svc) = setup().await;
        let p = create_as_a(&svc).await;
        let body = br#"{"quantity":3}"#;
        let err = svc.patch(&as_b().with_body(), &p.id.to_string(), body).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));
        let err = svc.patch(&as_b().with_body(), "999", body).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_missing_as_non_owner_is_not_found() {
        let (_repo, svc) = setup().await;
        create_as_a(&svc).await;
        let err = svc.delete(&as_b(), "999").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn patch_updates_given_fields_and_touches_timestamp() {
        let (repo, svc) = setup().await;
        let p = create_as_a(&svc).await;
        let out = svc.patch(&as_a().with_body(), &p.id.to_string(), br#"{"quantity":7}"#).await.unwrap();
        assert_eq!(out.status(), 204);
        let stored = repo.find_product(p.id).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 7);
        assert_eq!(stored.name, "Lamp");
        assert!(stored.date_last_updated >= p.date_last_updated);
        assert_eq!(stored.date_added, p.date_added);
    }

    #[tokio::test]
    async fn replace_requires_all_fields() {
        let (_repo, svc) = setup().await;
        let p = create_as_a(&svc).await;
        let err = svc.replace(&as_a().with_body(), &p.id.to_string(), br#"{"quantity":7}"#).await.unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(Rejection::MissingField(_))));
    }

    #[tokio::test]
    async fn unknown_field_on_patch_rejected_before_update() {
        let (repo, svc) = setup().await;
        let p = create_as_a(&svc).await;
        let err = svc
            .patch(&as_a().with_body(), &p.id.to_string(), br#"{"quantity":7,"owner_user_id":2}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(Rejection::UnknownField(_))));
        assert_eq!(repo.find_product(p.id).await.unwrap().unwrap().quantity, 50);
    }

    #[tokio::test]
    async fn delete_removes_product_and_its_images() {
        let (repo, svc) = setup().await;
        let p = create_as_a(&svc).await;
        repo.create_image(NewImage { product_id: p.id, file_name: "x.png".into(), s3_bucket_path: "1/1/u-x.png".into() })
            .await
            .unwrap();
        let out = svc.delete(&as_a(), &p.id.to_string()).await.unwrap();
        assert_eq!(out.status(), 204);
        assert!(repo.find_product(p.id).await.unwrap().is_none());
        assert!(repo.list_images(p.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn anonymous_reads_reject_credentials_and_query() {
        let (_repo, svc) = setup().await;
        let p = create_as_a(&svc).await;
        assert!(svc.get(&RequestEnvelope::anonymous(), &p.id.to_string()).await.is_ok());
        let err = svc.get(&as_a(), &p.id.to_string()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(Rejection::AuthorizationNotAllowed)));
        let err = svc.list(&RequestEnvelope::anonymous().with_query()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(Rejection::QueryNotAllowed)));
        assert_eq!(svc.list(&RequestEnvelope::anonymous()).await.unwrap().into_body().unwrap().len(), 1);
    }
}
