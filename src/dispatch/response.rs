//! Response sink handed to handlers.
//!
//! # Responsibilities
//! - Record the first terminal write (text, JSON or file)
//! - Carry status and headers for the eventual HTTP response
//!
//! # Design Decisions
//! - First terminal write wins; later writes are ignored and logged
//! - Files are recorded by path only; the server layer resolves content

use std::path::PathBuf;

use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use serde_json::Value;

/// Body of a terminal response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
    /// Path relative to the configured static root.
    File(PathBuf),
}

/// Finished response produced by a chain.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub payload: Payload,
}

/// Sink a handler writes its response into.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    payload: Option<Payload>,
    ignored_writes: u32,
}

impl Response {
    pub(crate) fn new() -> Self {
        Self {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            payload: None,
            ignored_writes: 0,
        }
    }

    /// Set the status used by the eventual terminal write.
    pub fn status(&mut self, status: StatusCode) -> &mut Self {
        if self.payload.is_none() {
            self.status = status;
        }
        self
    }

    pub fn set_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        if self.payload.is_none() {
            self.headers.insert(name, value);
        }
        self
    }

    /// Terminal text response.
    pub fn send(&mut self, body: impl Into<String>) {
        self.write(Payload::Text(body.into()));
    }

    /// Terminal JSON response.
    pub fn send_json(&mut self, value: impl Into<Value>) {
        self.write(Payload::Json(value.into()));
    }

    /// Terminal file response; content is resolved by the server layer.
    pub fn send_file(&mut self, path: impl Into<PathBuf>) {
        self.write(Payload::File(path.into()));
    }

    /// True once a terminal write happened.
    pub fn is_sent(&self) -> bool {
        self.payload.is_some()
    }

    /// Writes dropped because the response had already been sent.
    pub fn ignored_writes(&self) -> u32 {
        self.ignored_writes
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    pub(crate) fn into_reply(self) -> Option<Reply> {
        let Response {
            status,
            headers,
            payload,
            ..
        } = self;
        payload.map(|payload| Reply {
            status,
            headers,
            payload,
        })
    }

    fn write(&mut self, payload: Payload) {
        if self.payload.is_some() {
            self.ignored_writes += 1;
            tracing::warn!("Response already sent, ignoring additional write");
            return;
        }
        self.payload = Some(payload);
    }
}
