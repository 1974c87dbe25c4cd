//! Inbound request translation.
//!
//! # Responsibilities
//! - Read the request ID assigned by the request-id layer
//! - Map the HTTP method onto the router's verb enumeration
//! - Parse the query string and buffer the body
//! - Produce the `IncomingRequest` handed to the dispatcher
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Body size bounded before it is buffered
//! - Unsupported verbs and malformed query strings are rejected here,
//!   never reaching the dispatcher

use std::collections::HashMap;

use axum::body::{Body, Bytes};
use axum::extract::Query;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::dispatch::IncomingRequest;
use crate::routing::Method;

/// Header carrying the request ID.
pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Largest request body buffered for handlers.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Why a request never reached the dispatcher.
#[derive(Debug, Error)]
pub enum RequestRejection {
    #[error("Cannot {method} {path}")]
    UnsupportedMethod { method: String, path: String },

    #[error("Malformed query string: {0}")]
    BadQuery(String),

    #[error("Request body too large or unreadable")]
    Body,
}

impl IntoResponse for RequestRejection {
    fn into_response(self) -> Response {
        let status = match self {
            RequestRejection::UnsupportedMethod { .. } => StatusCode::NOT_FOUND,
            RequestRejection::BadQuery(_) => StatusCode::BAD_REQUEST,
            RequestRejection::Body => StatusCode::PAYLOAD_TOO_LARGE,
        };
        (status, self.to_string()).into_response()
    }
}

/// Request ID set by `SetRequestIdLayer`, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(&X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Build the dispatcher's view of an HTTP request.
pub async fn incoming_from_parts(parts: &Parts, body: Body) -> Result<IncomingRequest, RequestRejection> {
    let path = parts.uri.path().to_string();

    let method = Method::try_from(&parts.method).map_err(|_| RequestRejection::UnsupportedMethod {
        method: parts.method.to_string(),
        path: path.clone(),
    })?;

    let query = match parts.uri.query() {
        Some(_) => Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map(|Query(q)| q)
            .map_err(|e| RequestRejection::BadQuery(e.body_text()))?,
        None => HashMap::new(),
    };

    let body: Bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|_| RequestRejection::Body)?;

    Ok(IncomingRequest {
        method,
        path,
        query,
        headers: parts.headers.clone(),
        body,
    })
}
