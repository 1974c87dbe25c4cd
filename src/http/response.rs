//! Outcome to HTTP response translation.
//!
//! # Responsibilities
//! - Turn a `DispatchReport` into an HTTP response
//! - Serve `send_file` payloads from the static root
//! - Map not-found, stalled and no-response outcomes to status codes
//!
//! # Design Decisions
//! - Text payloads are sent as HTML unless a handler set a content type
//! - File content, ranges and conditional requests are left to `ServeFile`
//! - File paths that escape the static root are refused (403)
//! - A chain that ends without a response gets the same 404 as an unmatched route

use std::path::{Component, Path, PathBuf};

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{Method as HttpMethod, Request, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::dispatch::{DispatchReport, Outcome, Payload, Reply};

/// Text body used for unmatched routes and chains that never responded.
pub fn not_found_body(method: &HttpMethod, path: &str) -> String {
    format!("Cannot {} {}", method, path)
}

/// Build the HTTP response for a finished dispatch.
pub async fn into_http(report: DispatchReport, parts: Parts, static_root: &Path, request_id: &str) -> Response {
    match report.outcome {
        Outcome::Responded(reply) => reply_into_http(reply, parts, static_root).await,
        Outcome::NotFound => {
            (StatusCode::NOT_FOUND, not_found_body(&parts.method, parts.uri.path())).into_response()
        }
        Outcome::NoResponse => {
            tracing::debug!(
                request_id = %request_id,
                route = ?report.route,
                "Chain ended without a response"
            );
            (StatusCode::NOT_FOUND, not_found_body(&parts.method, parts.uri.path())).into_response()
        }
        Outcome::Stalled { handler } => {
            tracing::error!(
                request_id = %request_id,
                route = ?report.route,
                handler,
                "Stalled chain converted to server error"
            );
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

async fn reply_into_http(reply: Reply, parts: Parts, static_root: &Path) -> Response {
    let Reply {
        status,
        headers,
        payload,
    } = reply;

    match payload {
        Payload::Text(body) => (status, headers, Html(body)).into_response(),
        Payload::Json(value) => (status, headers, Json(value)).into_response(),
        Payload::File(path) => {
            let Some(full) = resolve_static(static_root, &path) else {
                tracing::warn!(path = %path.display(), "Refusing file outside static root");
                return (StatusCode::FORBIDDEN, "Forbidden").into_response();
            };

            let mut file_request = Request::from_parts(parts, Body::empty());
            if file_request.method() != HttpMethod::HEAD {
                *file_request.method_mut() = HttpMethod::GET;
            }

            let served = match ServeFile::new(&full).oneshot(file_request).await {
                Ok(res) => res.map(Body::new),
                Err(never) => match never {},
            };

            let mut response = (headers, served).into_response();
            if response.status() == StatusCode::OK && status != StatusCode::OK {
                *response.status_mut() = status;
            }
            response
        }
    }
}

/// Join `relative` onto `root`, refusing absolute paths and `..` components.
pub fn resolve_static(root: &Path, relative: &Path) -> Option<PathBuf> {
    let mut full = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => full.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(full)
}
