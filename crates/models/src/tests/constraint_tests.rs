use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, NotSet, Set};
use uuid::Uuid;

use super::db_or_skip;
use crate::errors::ModelError;
use crate::{account, image, product};

fn new_account(username: &str) -> account::ActiveModel {
    let now = Utc::now();
    account::ActiveModel {
        id: NotSet,
        first_name: Set("Grace".into()),
        last_name: Set("Hopper".into()),
        password: Set("$argon2id$placeholder".into()),
        username: Set(username.to_string()),
        account_created: Set(now.into()),
        account_updated: Set(now.into()),
    }
}

fn new_product(owner: i32, quantity: i32) -> product::ActiveModel {
    let now = Utc::now();
    product::ActiveModel {
        id: NotSet,
        name: Set("Gadget".into()),
        description: Set("A gadget".into()),
        sku: Set("G-1".into()),
        manufacturer: Set("Acme".into()),
        quantity: Set(quantity),
        date_added: Set(now.into()),
        date_last_updated: Set(now.into()),
        owner_user_id: Set(owner),
    }
}

#[tokio::test]
async fn duplicate_username_is_constraint_error() -> anyhow::Result<()> {
    let Some(db) = db_or_skip().await else { return Ok(()) };
    let username = format!("dup_{}@example.com", Uuid::new_v4().simple());
    let first = new_account(&username).insert(&db).await?;

    let err = new_account(&username).insert(&db).await.unwrap_err();
    assert!(matches!(ModelError::from(err), ModelError::Constraint(_)));

    account::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn quantity_outside_range_is_rejected_by_check() -> anyhow::Result<()> {
    let Some(db) = db_or_skip().await else { return Ok(()) };
    let owner = new_account(&format!("qty_{}@example.com", Uuid::new_v4().simple())).insert(&db).await?;

    assert!(new_product(owner.id, 101).insert(&db).await.is_err());
    assert!(new_product(owner.id, -1).insert(&db).await.is_err());
    let ok = new_product(owner.id, 100).insert(&db).await?;

    product::Entity::delete_by_id(ok.id).exec(&db).await?;
    account::Entity::delete_by_id(owner.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn image_for_missing_product_is_constraint_error() -> anyhow::Result<()> {
    let Some(db) = db_or_skip().await else { return Ok(()) };
    let err = image::ActiveModel {
        image_id: NotSet,
        product_id: Set(i32::MAX),
        file_name: Set("x.png".into()),
        date_created: Set(Utc::now().into()),
        s3_bucket_path: Set("0/0/x.png".into()),
    }
    .insert(&db)
    .await
    .unwrap_err();
    assert!(matches!(ModelError::from(err), ModelError::Constraint(_)));
    Ok(())
}
