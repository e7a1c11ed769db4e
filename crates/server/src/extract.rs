//! Request extractors that turn HTTP details into a [`RequestEnvelope`].

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::{header::AUTHORIZATION, request::Parts};
use axum::response::{IntoResponse, Response};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use service::{Credentials, RequestEnvelope};

/// Envelope plus the raw body. Works for every method; reads answer 400 if the body is non-empty.
pub struct Incoming {
    pub envelope: RequestEnvelope,
    pub body: Bytes,
}

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for Incoming {
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (parts, body) = req.into_parts();
        let mut envelope = envelope_from_parts(&parts);
        let body = Bytes::from_request(Request::from_parts(parts, body), state)
            .await
            .map_err(IntoResponse::into_response)?;
        envelope.has_body = !body.is_empty();
        Ok(Self { envelope, body })
    }
}

/// Envelope without touching the body; used next to the multipart extractor.
pub struct Envelope(pub RequestEnvelope);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Envelope {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(envelope_from_parts(parts)))
    }
}

fn envelope_from_parts(parts: &Parts) -> RequestEnvelope {
    let has_query = parts.uri.query().map(|q| !q.is_empty()).unwrap_or(false);
    let header = parts.headers.get(AUTHORIZATION);
    let credentials = header.and_then(|v| v.to_str().ok()).and_then(parse_basic);
    RequestEnvelope { has_query, has_body: false, has_authorization: header.is_some(), credentials }
}

/// `Basic base64(username:password)`; anything else yields no credentials.
pub fn parse_basic(value: &str) -> Option<Credentials> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let pair = String::from_utf8(decoded).ok()?;
    let (username, password) = pair.split_once(':')?;
    Some(Credentials { username: username.to_string(), password: password.to_string() })
}
