use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::{account, health_check, image, product};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};

use crate::account::domain::{Account, AccountChanges, NewAccountRecord};
use crate::account::repository::AccountRepository;
use crate::errors::RepositoryError;
use crate::health::HealthRepository;
use crate::image::domain::{Image, NewImage};
use crate::image::repository::ImageRepository;
use crate::product::domain::{NewProduct, Product};
use crate::product::repository::ProductRepository;
use crate::store::timed;
use crate::validation::product::ProductField;

/// SeaORM-backed implementation of every repository trait over one pool.
#[derive(Clone)]
pub struct SeaOrmRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_account(m: account::Model) -> Account {
    Account {
        id: m.id,
        first_name: m.first_name,
        last_name: m.last_name,
        username: m.username,
        password_hash: m.password,
        account_created: m.account_created.with_timezone(&Utc),
        account_updated: m.account_updated.with_timezone(&Utc),
    }
}

fn to_product(m: product::Model) -> Product {
    Product {
        id: m.id,
        name: m.name,
        description: m.description,
        sku: m.sku,
        manufacturer: m.manufacturer,
        quantity: m.quantity,
        date_added: m.date_added.with_timezone(&Utc),
        date_last_updated: m.date_last_updated.with_timezone(&Utc),
        owner_user_id: m.owner_user_id,
    }
}

fn to_image(m: image::Model) -> Image {
    Image {
        image_id: m.image_id,
        product_id: m.product_id,
        file_name: m.file_name,
        date_created: m.date_created.with_timezone(&Utc),
        s3_bucket_path: m.s3_bucket_path,
    }
}

#[async_trait]
impl AccountRepository for SeaOrmRepository {
    async fn find_account(&self, id: i32) -> Result<Option<Account>, RepositoryError> {
        let res = timed("account.find", account::Entity::find_by_id(id).one(&self.db)).await?;
        Ok(res.map(to_account))
    }

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, RepositoryError> {
        let query = account::Entity::find()
            .filter(account::Column::Username.eq(username.to_string()))
            .one(&self.db);
        Ok(timed("account.find_by_username", query).await?.map(to_account))
    }

    async fn create_account(&self, new: NewAccountRecord) -> Result<Account, RepositoryError> {
        let now = Utc::now();
        let am = account::ActiveModel {
            id: NotSet,
            first_name: Set(new.first_name),
            last_name: Set(new.last_name),
            password: Set(new.password_hash),
            username: Set(new.username),
            account_created: Set(now.into()),
            account_updated: Set(now.into()),
        };
        let created = timed("account.insert", am.insert(&self.db)).await?;
        Ok(to_account(created))
    }

    async fn update_account(&self, id: i32, changes: AccountChanges) -> Result<(), RepositoryError> {
        let updated_at: sea_orm::prelude::DateTimeWithTimeZone = changes.updated_at.into();
        let query = account::Entity::update_many()
            .col_expr(account::Column::FirstName, Expr::value(changes.first_name))
            .col_expr(account::Column::LastName, Expr::value(changes.last_name))
            .col_expr(account::Column::Password, Expr::value(changes.password_hash))
            .col_expr(account::Column::AccountUpdated, Expr::value(updated_at))
            .filter(account::Column::Id.eq(id))
            .exec(&self.db);
        timed("account.update", query).await?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for SeaOrmRepository {
    async fn find_product(&self, id: i32) -> Result<Option<Product>, RepositoryError> {
        let res = timed("product.find", product::Entity::find_by_id(id).one(&self.db)).await?;
        Ok(res.map(to_product))
    }

    async fn list_products(&self) -> Result<Vec<Product>, RepositoryError> {
        let query = product::Entity::find().order_by_asc(product::Column::Id).all(&self.db);
        Ok(timed("product.list", query).await?.into_iter().map(to_product).collect())
    }

    async fn create_product(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let now = Utc::now();
        let d = new.draft;
        let am = product::ActiveModel {
            id: NotSet,
            name: Set(d.name),
            description: Set(d.description),
            sku: Set(d.sku),
            manufacturer: Set(d.manufacturer),
            quantity: Set(d.quantity),
            date_added: Set(now.into()),
            date_last_updated: Set(now.into()),
            owner_user_id: Set(new.owner_user_id),
        };
        let created = timed("product.insert", am.insert(&self.db)).await?;
        Ok(to_product(created))
    }

    async fn update_product(&self, id: i32, fields: Vec<ProductField>, touched_at: DateTime<Utc>) -> Result<(), RepositoryError> {
        let touched: sea_orm::prelude::DateTimeWithTimeZone = touched_at.into();
        let mut update = product::Entity::update_many()
            .col_expr(product::Column::DateLastUpdated, Expr::value(touched));
        for field in fields {
            update = match field {
                ProductField::Name(v) => update.col_expr(product::Column::Name, Expr::value(v)),
                ProductField::Description(v) => update.col_expr(product::Column::Description, Expr::value(v)),
                ProductField::Sku(v) => update.col_expr(product::Column::Sku, Expr::value(v)),
                ProductField::Manufacturer(v) => update.col_expr(product::Column::Manufacturer, Expr::value(v)),
                ProductField::Quantity(v) => update.col_expr(product::Column::Quantity, Expr::value(v)),
            };
        }
        let query = update.filter(product::Column::Id.eq(id)).exec(&self.db);
        timed("product.update", query).await?;
        Ok(())
    }

    async fn delete_product(&self, id: i32) -> Result<(), RepositoryError> {
        timed("product.delete", product::Entity::delete_by_id(id).exec(&self.db)).await?;
        Ok(())
    }
}

#[async_trait]
impl ImageRepository for SeaOrmRepository {
    async fn find_image(&self, image_id: i32) -> Result<Option<Image>, RepositoryError> {
        let res = timed("image.find", image::Entity::find_by_id(image_id).one(&self.db)).await?;
        Ok(res.map(to_image))
    }

    async fn list_images(&self, product_id: i32) -> Result<Vec<Image>, RepositoryError> {
        let query = image::Entity::find()
            .filter(image::Column::ProductId.eq(product_id))
            .order_by_asc(image::Column::ImageId)
            .all(&self.db);
        Ok(timed("image.list", query).await?.into_iter().map(to_image).collect())
    }

    async fn create_image(&self, new: NewImage) -> Result<Image, RepositoryError> {
        let am = image::ActiveModel {
            image_id: NotSet,
            product_id: Set(new.product_id),
            file_name: Set(new.file_name),
            date_created: Set(Utc::now().into()),
            s3_bucket_path: Set(new.s3_bucket_path),
        };
        let created = timed("image.insert", am.insert(&self.db)).await?;
        Ok(to_image(created))
    }

    async fn delete_image(&self, image_id: i32) -> Result<(), RepositoryError> {
        timed("image.delete", image::Entity::delete_by_id(image_id).exec(&self.db)).await?;
        Ok(())
    }

    async fn delete_images_for_product(&self, product_id: i32) -> Result<u64, RepositoryError> {
        let query = image::Entity::delete_many()
            .filter(image::Column::ProductId.eq(product_id))
            .exec(&self.db);
        Ok(timed("image.delete_by_product", query).await?.rows_affected)
    }
}

#[async_trait]
impl HealthRepository for SeaOrmRepository {
    async fn record_check(&self) -> Result<(), RepositoryError> {
        timed("health_check.insert", health_check::record(&self.db)).await?;
        Ok(())
    }
}
