//! SeaORM entities for the catalog tables plus connection helpers.

pub mod errors;
pub mod db;
pub mod account;
pub mod product;
pub mod image;
pub mod health_check;

#[cfg(test)]
mod tests;
