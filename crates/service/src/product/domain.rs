use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::validation::product::ProductDraft;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub manufacturer: String,
    pub quantity: i32,
    pub date_added: DateTime<Utc>,
    pub date_last_updated: DateTime<Utc>,
    pub owner_user_id: i32,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub draft: ProductDraft,
    pub owner_user_id: i32,
}
