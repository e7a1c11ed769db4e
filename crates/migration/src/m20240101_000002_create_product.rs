//! Create `product` table with FK to `users`.
//!
//! `quantity` is constrained to 0..=100 at the database level as well.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Product::Table)
                    .if_not_exists()
                    .col(pk_auto(Product::Id))
                    .col(string(Product::Name))
                    .col(string(Product::Description))
                    .col(string(Product::Sku))
                    .col(string(Product::Manufacturer))
                    .col(
                        integer(Product::Quantity).check(
                            Expr::col(Product::Quantity)
                                .gte(0)
                                .and(Expr::col(Product::Quantity).lte(100)),
                        ),
                    )
                    .col(
                        timestamp_with_time_zone(Product::DateAdded)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Product::DateLastUpdated)
                            .default(Expr::current_timestamp()),
                    )
                    .col(integer(Product::OwnerUserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_owner")
                            .from(Product::Table, Product::OwnerUserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Product::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Product {
    Table,
    Id,
    Name,
    Description,
    Sku,
    Manufacturer,
    Quantity,
    DateAdded,
    DateLastUpdated,
    OwnerUserId,
}

#[derive(DeriveIden)]
enum Users { Table, Id }
