use thiserror::Error;

use crate::blob::BlobError;
use crate::validation::Rejection;

/// Failures reported by a relational repository, split by whether the caller sent bad data
/// or the store could not be reached.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<models::errors::ModelError> for RepositoryError {
    fn from(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Constraint(msg) => RepositoryError::Constraint(msg),
            models::errors::ModelError::Db(msg) => RepositoryError::Unavailable(msg),
        }
    }
}

impl From<sea_orm::DbErr> for RepositoryError {
    fn from(e: sea_orm::DbErr) -> Self {
        models::errors::ModelError::from(e).into()
    }
}

/// Outcome classes of every lifecycle operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("malformed request: {0}")]
    Malformed(#[from] Rejection),
    #[error("authentication required")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("method not supported")]
    MethodNotSupported,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::Constraint(msg) => ServiceError::Malformed(Rejection::Constraint(msg)),
            RepositoryError::Unavailable(msg) => ServiceError::StoreUnavailable(msg),
        }
    }
}

impl From<BlobError> for ServiceError {
    fn from(e: BlobError) -> Self {
        ServiceError::StoreUnavailable(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(e: tokio::task::JoinError) -> Self {
        ServiceError::Internal(format!("storage task failed: {e}"))
    }
}

impl ServiceError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Malformed(r) => r.code(),
            ServiceError::Unauthenticated => 2001,
            ServiceError::Forbidden => 2002,
            ServiceError::NotFound(_) => 3001,
            ServiceError::MethodNotSupported => 3002,
            ServiceError::StoreUnavailable(_) => 5001,
            ServiceError::Internal(_) => 5000,
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Malformed(_) => 400,
            ServiceError::Unauthenticated => 401,
            ServiceError::Forbidden => 403,
            ServiceError::NotFound(_) => 404,
            ServiceError::MethodNotSupported => 405,
            ServiceError::StoreUnavailable(_) => 503,
            ServiceError::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_maps_to_bad_request() {
        let e: ServiceError = RepositoryError::Constraint("users_username_key".into()).into();
        assert_eq!(e.status(), 400);
        let e: ServiceError = RepositoryError::Unavailable("pool timed out".into()).into();
        assert_eq!(e.status(), 503);
    }

    #[test]
    fn codes_are_distinct_per_class() {
        let all = [
            ServiceError::Unauthenticated,
            ServiceError::Forbidden,
            ServiceError::NotFound("product"),
            ServiceError::MethodNotSupported,
            ServiceError::StoreUnavailable(String::new()),
            ServiceError::Internal(String::new()),
            ServiceError::Malformed(Rejection::QueryNotAllowed),
        ];
        let mut codes: Vec<u16> = all.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
