use std::sync::Arc;

use service::account::{repository::AccountRepository, AccountService};
use service::auth::{Authorizer, CredentialHasher};
use service::blob::BlobStore;
use service::health::{HealthRepository, HealthService};
use service::image::{repository::ImageRepository, ImageService};
use service::notify::NotificationPublisher;
use service::product::{repository::ProductRepository, ProductService};

/// Shared handler state: one orchestrator per resource.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub products: Arc<ProductService>,
    pub images: Arc<ImageService>,
    pub health: Arc<HealthService>,
}

impl AppState {
    /// Wire orchestrators over one repository handle that serves every table.
    pub fn new<R>(
        repo: Arc<R>,
        blobs: Arc<dyn BlobStore>,
        notifier: Arc<dyn NotificationPublisher>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self
    where
        R: AccountRepository + ProductRepository + ImageRepository + HealthRepository + 'static,
    {
        let authorizer = Arc::new(Authorizer::new(repo.clone(), hasher.clone()));
        Self {
            accounts: Arc::new(AccountService::new(repo.clone(), authorizer.clone(), hasher, notifier)),
            products: Arc::new(ProductService::new(repo.clone(), repo.clone(), authorizer.clone())),
            images: Arc::new(ImageService::new(repo.clone(), repo.clone(), blobs, authorizer)),
            health: Arc::new(HealthService::new(repo)),
        }
    }
}
