//! Response mapping: orchestrator results to a status code and optional body.

use serde::Serialize;

use crate::errors::ServiceError;

/// Successful lifecycle result.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Created(T),
    NoContent,
}

impl<T> Outcome<T> {
    pub fn status(&self) -> u16 {
        match self {
            Outcome::Ok(_) => 200,
            Outcome::Created(_) => 201,
            Outcome::NoContent => 204,
        }
    }

    pub fn into_body(self) -> Option<T> {
        match self {
            Outcome::Ok(v) | Outcome::Created(v) => Some(v),
            Outcome::NoContent => None,
        }
    }
}

/// JSON body sent with every error except 405.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: u16,
}

/// Status and body for a failed operation. Internal detail of store and task
/// failures stays in the logs.
pub fn error_reply(err: &ServiceError) -> (u16, Option<ErrorBody>) {
    let body = match err {
        ServiceError::MethodNotSupported => None,
        ServiceError::StoreUnavailable(_) => Some("service unavailable".to_string()),
        ServiceError::Internal(_) => Some("internal error".to_string()),
        other => Some(other.to_string()),
    };
    (err.status(), body.map(|error| ErrorBody { error, code: err.code() }))
}
