use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, NotSet, Set};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "health_checks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub check_id: i32,
    pub check_datetime: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Record one successful probe.
pub async fn record(db: &DatabaseConnection) -> Result<Model, ModelError> {
    let am = ActiveModel { check_id: NotSet, check_datetime: Set(Utc::now().into()) };
    Ok(am.insert(db).await?)
}
