use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Image metadata. `s3_bucket_path` is the blob key; the payload is stored outside the database.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "image")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub image_id: i32,
    pub product_id: i32,
    pub file_name: String,
    pub date_created: DateTimeWithTimeZone,
    pub s3_bucket_path: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Product,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Product => Entity::belongs_to(crate::product::Entity)
                .from(Column::ProductId)
                .to(crate::product::Column::Id)
                .into(),
        }
    }
}

impl Related<crate::product::Entity> for Entity {
    fn to() -> RelationDef { Relation::Product.def() }
}

impl ActiveModelBehavior for ActiveModel {}
