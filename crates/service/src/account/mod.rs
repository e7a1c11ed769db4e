//! Accounts: registration, self-read and self-update.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::AccountService;
