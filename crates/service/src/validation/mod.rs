//! Pure request classification. Every check runs before any store is touched and
//! returns either the decoded input or a [`Rejection`] naming the reason.

pub mod account;
pub mod product;
pub mod upload;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::request::RequestEnvelope;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("query string not allowed")]
    QueryNotAllowed,
    #[error("request body not allowed")]
    BodyNotAllowed,
    #[error("authorization header not allowed")]
    AuthorizationNotAllowed,
    #[error("request body required")]
    EmptyBody,
    #[error("invalid json: {0}")]
    InvalidJson(String),
    #[error("json object expected")]
    NotAnObject,
    #[error("unknown field `{0}`")]
    UnknownField(String),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: &'static str },
    #[error("invalid id")]
    InvalidId,
    #[error("exactly one file expected, got {0}")]
    AttachmentCount(usize),
    #[error("unexpected form field `{0}`")]
    UnexpectedPart(String),
    #[error("file name missing")]
    MissingFileName,
    #[error("file is empty")]
    EmptyFile,
    #[error("unsupported content type `{0}`")]
    UnsupportedContentType(String),
    #[error("unreadable multipart body: {0}")]
    Multipart(String),
    #[error("username already registered")]
    DuplicateUsername,
    #[error("constraint violation: {0}")]
    Constraint(String),
}

impl Rejection {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            Rejection::QueryNotAllowed => 1001,
            Rejection::BodyNotAllowed => 1002,
            Rejection::AuthorizationNotAllowed => 1003,
            Rejection::EmptyBody => 1004,
            Rejection::InvalidJson(_) => 1005,
            Rejection::NotAnObject => 1006,
            Rejection::UnknownField(_) => 1007,
            Rejection::MissingField(_) => 1008,
            Rejection::InvalidField { .. } => 1009,
            Rejection::InvalidId => 1010,
            Rejection::AttachmentCount(_) => 1101,
            Rejection::UnexpectedPart(_) => 1102,
            Rejection::MissingFileName => 1103,
            Rejection::EmptyFile => 1104,
            Rejection::UnsupportedContentType(_) => 1105,
            Rejection::Multipart(_) => 1106,
            Rejection::DuplicateUsername => 1201,
            Rejection::Constraint(_) => 1202,
        }
    }
}

/// Anonymous reads: no query, no body, no credentials.
pub fn check_read(env: &RequestEnvelope) -> Result<(), Rejection> {
    if env.has_query {
        return Err(Rejection::QueryNotAllowed);
    }
    if env.has_body {
        return Err(Rejection::BodyNotAllowed);
    }
    if env.has_authorization {
        return Err(Rejection::AuthorizationNotAllowed);
    }
    Ok(())
}

/// Authenticated requests that carry no payload (account read, deletes).
pub fn check_bodyless(env: &RequestEnvelope) -> Result<(), Rejection> {
    if env.has_query {
        return Err(Rejection::QueryNotAllowed);
    }
    if env.has_body {
        return Err(Rejection::BodyNotAllowed);
    }
    Ok(())
}

/// Authenticated create/replace/patch with a JSON payload.
pub fn check_write(env: &RequestEnvelope) -> Result<(), Rejection> {
    if env.has_query {
        return Err(Rejection::QueryNotAllowed);
    }
    if !env.has_body {
        return Err(Rejection::EmptyBody);
    }
    Ok(())
}

/// Registration: a write that must not carry credentials.
pub fn check_anonymous_write(env: &RequestEnvelope) -> Result<(), Rejection> {
    check_write(env)?;
    if env.has_authorization {
        return Err(Rejection::AuthorizationNotAllowed);
    }
    Ok(())
}

/// Multipart uploads; part-level rules live in [`upload`].
pub fn check_upload(env: &RequestEnvelope) -> Result<(), Rejection> {
    if env.has_query {
        return Err(Rejection::QueryNotAllowed);
    }
    Ok(())
}

/// Path ids are positive decimal integers.
pub fn parse_id(raw: &str) -> Result<i32, Rejection> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Rejection::InvalidId);
    }
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(Rejection::InvalidId),
    }
}

pub(crate) fn parse_object(body: &[u8]) -> Result<Map<String, Value>, Rejection> {
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(Rejection::EmptyBody);
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Rejection::NotAnObject),
        Err(e) => Err(Rejection::InvalidJson(e.to_string())),
    }
}

/// Non-empty (after trim) JSON string.
pub(crate) fn text(field: &'static str, value: &Value) -> Result<String, Rejection> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.clone()),
        Value::String(_) => Err(Rejection::InvalidField { field, reason: "must not be empty" }),
        _ => Err(Rejection::InvalidField { field, reason: "must be a string" }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_rejects_query_body_and_credentials() {
        assert_eq!(check_read(&RequestEnvelope::anonymous()), Ok(()));
        assert_eq!(check_read(&RequestEnvelope::anonymous().with_query()), Err(Rejection::QueryNotAllowed));
        assert_eq!(check_read(&RequestEnvelope::anonymous().with_body()), Err(Rejection::BodyNotAllowed));
        assert_eq!(check_read(&RequestEnvelope::basic("a@b.co", "x")), Err(Rejection::AuthorizationNotAllowed));
    }

    #[test]
    fn writes_require_a_body() {
        assert_eq!(check_write(&RequestEnvelope::basic("a@b.co", "x")), Err(Rejection::EmptyBody));
        assert_eq!(check_write(&RequestEnvelope::basic("a@b.co", "x").with_body()), Ok(()));
        assert_eq!(
            check_anonymous_write(&RequestEnvelope::basic("a@b.co", "x").with_body()),
            Err(Rejection::AuthorizationNotAllowed)
        );
    }

    #[test]
    fn bodyless_mutation_rejects_body() {
        assert_eq!(check_bodyless(&RequestEnvelope::basic("a@b.co", "x").with_body()), Err(Rejection::BodyNotAllowed));
    }

    #[test]
    fn ids_must_be_positive_decimal() {
        assert_eq!(parse_id("42"), Ok(42));
        for bad in ["", "0", "-1", "+3", "1.5", "abc", " 7", "99999999999"] {
            assert_eq!(parse_id(bad), Err(Rejection::InvalidId), "{bad:?}");
        }
    }

    #[test]
    fn body_must_be_an_object() {
        assert_eq!(parse_object(b"  "), Err(Rejection::EmptyBody));
        assert_eq!(parse_object(b"[1]"), Err(Rejection::NotAnObject));
        assert!(matches!(parse_object(b"{oops"), Err(Rejection::InvalidJson(_))));
    }
}
