//! Create `health_checks` table; one row per successful probe.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HealthChecks::Table)
                    .if_not_exists()
                    .col(pk_auto(HealthChecks::CheckId))
                    .col(
                        timestamp_with_time_zone(HealthChecks::CheckDatetime)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(HealthChecks::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum HealthChecks { Table, CheckId, CheckDatetime }
