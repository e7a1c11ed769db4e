use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::account::domain::{Account, AccountChanges, NewAccountRecord};
use crate::account::repository::AccountRepository;
use crate::errors::RepositoryError;
use crate::health::HealthRepository;
use crate::image::domain::{Image, NewImage};
use crate::image::repository::ImageRepository;
use crate::product::domain::{NewProduct, Product};
use crate::product::repository::ProductRepository;
use crate::validation::product::ProductField;

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i32, Account>,
    products: BTreeMap<i32, Product>,
    images: BTreeMap<i32, Image>,
    health_checks: u64,
    last_account_id: i32,
    last_product_id: i32,
    last_image_id: i32,
}

/// In-memory implementation of every repository trait. Mirrors the database rules that
/// matter to callers (unique username, product/image foreign keys, image cascade) and can
/// be told to fail reads or writes as an unreachable store would.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryRepository {
    pub fn fail_reads(&self, on: bool) { self.fail_reads.store(on, Ordering::SeqCst); }
    pub fn fail_writes(&self, on: bool) { self.fail_writes.store(on, Ordering::SeqCst); }
    pub fn health_checks(&self) -> u64 { self.tables.lock().unwrap().health_checks }

    fn read(&self) -> Result<std::sync::MutexGuard<'_, Tables>, RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("injected read failure".into()));
        }
        Ok(self.tables.lock().unwrap())
    }

    fn write(&self) -> Result<std::sync::MutexGuard<'_, Tables>, RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("injected write failure".into()));
        }
        Ok(self.tables.lock().unwrap())
    }
}

fn now() -> DateTime<Utc> { Utc::now() }

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn find_account(&self, id: i32) -> Result<Option<Account>, RepositoryError> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self.read()?.accounts.values().find(|a| a.username == username).cloned())
    }

    async fn create_account(&self, new: NewAccountRecord) -> Result<Account, RepositoryError> {
        let mut t = self.write()?;
        if t.accounts.values().any(|a| a.username == new.username) {
            return Err(RepositoryError::Constraint("users_username_key".into()));
        }
        t.last_account_id += 1;
        let ts = now();
        let account = Account {
            id: t.last_account_id,
            first_name: new.first_name,
            last_name: new.last_name,
            username: new.username,
            password_hash: new.password_hash,
            account_created: ts,
            account_updated: ts,
        };
        t.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn update_account(&self, id: i32, changes: AccountChanges) -> Result<(), RepositoryError> {
        let mut t = self.write()?;
        if let Some(a) = t.accounts.get_mut(&id) {
            a.first_name = changes.first_name;
            a.last_name = changes.last_name;
            a.password_hash = changes.password_hash;
            a.account_updated = changes.updated_at;
        }
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepository {
    async fn find_product(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        Ok(self.read()?.products.get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let mut t = self.write()?;
        if !t.accounts.contains_key(&new.owner_user_id) {
            return Err(RepositoryError::Constraint("fk_product_owner".into()));
        }
        t.last_product_id += 1;
        let ts = now();
        let d = new.draft;
        let product = Product {
            id: t.last_product_id,
            name: d.name,
            description: d.description,
            sku: d.sku,
            manufacturer: d.manufacturer,
            quantity: d.quantity,
            date_added: ts,
            date_last_updated: ts,
            owner_user_id: new.owner_user_id,
        };
        t.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: i32, fields: Vec<ProductField>, touched_at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut t = self.write()?;
        if let Some(p) = t.products.get_mut(&id) {
            for field in fields {
                match field {
                    ProductField::Name(v) => p.name = v,
                    ProductField::Description(v) => p.description = v,
                    ProductField::Sku(v) => p.sku = v,
                    ProductField::Manufacturer(v) => p.manufacturer = v,
                    ProductField::Quantity(v) => p.quantity = v,
                }
            }
            p.date_last_updated = touched_at;
        }
        Ok(())
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        let mut t = self.write()?;
        t.images.retain(|_, img| img.product_id != id);
        t.products.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl ImageRepository for InMemoryRepository {
    async fn find_image(&self, image_id: i32) -> Result<Option<Image>, RepositoryError> {
        Ok(self.read()?.images.get(&image_id).cloned())
    }

    async fn list_images(&self, product_id: i32) -> Result<Vec<Image>, RepositoryError> {
        Ok(self.read()?.images.values().filter(|i| i.product_id == product_id).cloned().collect())
    }

    async fn create_image(&self, new: NewImage) -> Result<Image, RepositoryError> {
        let mut t = self.write()?;
        if !t.products.contains_key(&new.product_id) {
            return Err(RepositoryError::Constraint("fk_image_product".into()));
        }
        t.last_image_id += 1;
        let image = Image {
            image_id: t.last_image_id,
            product_id: new.product_id,
            file_name: new.file_name,
            date_created: now(),
            s3_bucket_path: new.s3_bucket_path,
        };
        t.images.insert(image.image_id, image.clone());
        Ok(image)
    }

    async fn delete_image(&self, image_id: i32) -> Result<(), RepositoryError> {
        self.write()?.images.remove(&image_id);
        Ok(())
    }

    async fn delete_images_for_product(&self, product_id: i32) -> Result<u64, RepositoryError> {
        let mut t = self.write()?;
        let before = t.images.len();
        t.images.retain(|_, img| img.product_id != product_id);
        Ok((before - t.images.len()) as u64)
    }
}

#[async_trait]
impl HealthRepository for InMemoryRepository {
    async fn record_check(&self) -> Result<(), RepositoryError> {
        self.write()?.health_checks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::product::ProductDraft;

    fn record(username: &str) -> NewAccountRecord {
        NewAccountRecord {
            first_name: "F".into(),
            last_name: "L".into(),
            username: username.into(),
            password_hash: "$argon2id$stub".into(),
        }
    }

    #[tokio::test]
    async fn username_is_unique() {
        let repo = InMemoryRepository::default();
        repo.create_account(record("a@b.co")).await.unwrap();
        let err = repo.create_account(record("a@b.co")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Constraint(_)));
    }

    #[tokio::test]
    async fn image_requires_product_and_cascades_on_delete() {
        let repo = InMemoryRepository::default();
        let orphan = NewImage { product_id: 1, file_name: "x.png".into(), s3_bucket_path: "k".into() };
        assert!(matches!(repo.create_image(orphan.clone()).await, Err(RepositoryError::Constraint(_))));

        let owner = repo.create_account(record("a@b.co")).await.unwrap();
        let draft = ProductDraft { name: "n".into(), description: "d".into(), sku: "s".into(), manufacturer: "m".into(), quantity: 1 };
        let p = repo.create_product(NewProduct { draft, owner_user_id: owner.id }).await.unwrap();
        repo.create_image(orphan).await.unwrap();
        assert_eq!(repo.delete_images_for_product(p.id).await.unwrap(), 1);
        assert!(repo.list_images(p.id).await.unwrap().is_empty());
    }
}
