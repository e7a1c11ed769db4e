//! Create `image` table with FK to `product`.
//!
//! Rows reference a blob by `s3_bucket_path`; the payload itself lives in the blob store.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Image::Table)
                    .if_not_exists()
                    .col(pk_auto(Image::ImageId))
                    .col(integer(Image::ProductId))
                    .col(string(Image::FileName))
                    .col(
                        timestamp_with_time_zone(Image::DateCreated)
                            .default(Expr::current_timestamp()),
                    )
                    .col(string(Image::S3BucketPath))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_image_product")
                            .from(Image::Table, Image::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Image::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Image { Table, ImageId, ProductId, FileName, DateCreated, S3BucketPath }

#[derive(DeriveIden)]
enum Product { Table, Id }
