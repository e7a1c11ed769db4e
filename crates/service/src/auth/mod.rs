//! Auth module: credential hashing and the per-request authorizer.
//!
//! Authentication is HTTP Basic against the account table; ownership checks
//! compare the resolved principal with the owning account of a product.

pub mod hasher;
pub mod authorizer;

pub use authorizer::{Authorizer, Principal};
pub use hasher::{Argon2Hasher, CredentialHasher, HashError};
