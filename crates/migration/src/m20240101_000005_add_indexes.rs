use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Product: owner lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_product_owner")
                    .table(Product::Table)
                    .col(Product::OwnerUserId)
                    .to_owned(),
            )
            .await?;

        // Image: listing and cascade by product
        manager
            .create_index(
                Index::create()
                    .name("idx_image_product")
                    .table(Image::Table)
                    .col(Image::ProductId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_health_checks_check_datetime")
                    .table(HealthChecks::Table)
                    .col(HealthChecks::CheckDatetime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_product_owner").table(Product::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_image_product").table(Image::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name("idx_health_checks_check_datetime")
                    .table(HealthChecks::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum Product { Table, OwnerUserId }

#[derive(DeriveIden)]
enum Image { Table, ProductId }

#[derive(DeriveIden)]
enum HealthChecks { Table, CheckDatetime }
