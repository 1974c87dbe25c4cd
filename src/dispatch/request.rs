//! Request view and per-request context.
//!
//! # Responsibilities
//! - Carry the inbound method, path, query, headers and body
//! - Expose path parameters bound by the route table
//! - Hold the mutable context shared by every handler in one chain
//!
//! # Design Decisions
//! - A fresh `Request` (and so a fresh `Context`) is built per dispatch
//! - Context fields are named JSON values so any handler can read any field
//! - Path and query parameters stay strings; coercion is the handler's job

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::routing::Method;

/// What the server layer hands to the dispatcher for one request.
#[derive(Debug, Clone)]
pub struct IncomingRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IncomingRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Per-request scratch space shared across a chain's handlers.
#[derive(Debug, Default, Clone)]
pub struct Context {
    fields: Map<String, Value>,
}

impl Context {
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Read a field as a concrete type. `None` if absent or of another shape.
    pub fn get_as<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.fields
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Request view passed to every handler.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    params: HashMap<String, String>,
    query: HashMap<String, String>,
    headers: HeaderMap,
    body: Bytes,
    /// Mutable fields shared along the chain.
    pub context: Context,
}

impl Request {
    pub(crate) fn new(incoming: IncomingRequest, params: HashMap<String, String>) -> Self {
        Self {
            method: incoming.method,
            path: incoming.path,
            params,
            query: incoming.query,
            headers: incoming.headers,
            body: incoming.body,
            context: Context::default(),
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Captured path parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Query-string parameter by name.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn query_map(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_fields() {
        let mut ctx = Context::default();
        assert!(ctx.is_empty());

        ctx.insert("begin_time", 1_700_000_000_000u64);
        ctx.insert("user", "ada");

        assert_eq!(ctx.get_as::<u64>("begin_time"), Some(1_700_000_000_000));
        assert_eq!(ctx.get_as::<String>("user").as_deref(), Some("ada"));
        assert_eq!(ctx.get_as::<u64>("user"), None);
        assert_eq!(ctx.len(), 2);

        assert!(ctx.remove("user").is_some());
        assert!(!ctx.contains("user"));
    }

    #[test]
    fn test_request_binds_params_and_query() {
        let incoming = IncomingRequest::new(Method::Get, "/games/7").with_query("begin", "1");
        let params = HashMap::from([("id".to_string(), "7".to_string())]);
        let req = Request::new(incoming, params);

        assert_eq!(req.method(), Method::Get);
        assert_eq!(req.path(), "/games/7");
        assert_eq!(req.param("id"), Some("7"));
        assert_eq!(req.param("missing"), None);
        assert_eq!(req.query("begin"), Some("1"));
        assert!(req.context.is_empty());
    }
}
