//! Products: owned by an account, readable by anyone.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::ProductService;
