//! Service layer: request validation, authorization and the resource lifecycle
//! orchestrators for accounts, products and product images.
//! - Orchestrators depend on collaborator traits (`Arc<dyn ...>`), never on globals.
//! - SeaORM and in-memory repository implementations live under `repo`.
//! - Errors carry a stable numeric code and an HTTP status for the web layer.

pub mod errors;
pub mod request;
pub mod validation;
pub mod auth;
pub mod account;
pub mod product;
pub mod image;
pub mod health;
pub mod blob;
pub mod notify;
pub mod response;
pub mod repo;
pub mod store;

pub use errors::{RepositoryError, ServiceError};
pub use request::{Credentials, RequestEnvelope};
pub use response::Outcome;
