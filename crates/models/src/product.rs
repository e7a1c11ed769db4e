use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub manufacturer: String,
    pub quantity: i32,
    pub date_added: DateTimeWithTimeZone,
    pub date_last_updated: DateTimeWithTimeZone,
    pub owner_user_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Owner,
    Image,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(crate::account::Entity)
                .from(Column::OwnerUserId)
                .to(crate::account::Column::Id)
                .into(),
            Relation::Image => Entity::has_many(crate::image::Entity).into(),
        }
    }
}

impl Related<crate::account::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl Related<crate::image::Entity> for Entity {
    fn to() -> RelationDef { Relation::Image.def() }
}

impl ActiveModelBehavior for ActiveModel {}
