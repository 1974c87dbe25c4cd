//! Route registration and lookup.
//!
//! # Responsibilities
//! - Store compiled routes in registration order
//! - Reject duplicate (method, pattern) registrations
//! - Look up the first route matching a request's method and path
//!
//! # Design Decisions
//! - Immutable once frozen into a dispatcher (thread-safe without locks)
//! - O(n) scan in registration order: the earliest registered route wins,
//!   so route authors must register specific routes before general ones
//! - HEAD requests fall back to GET routes when no HEAD route matches
//! - Explicit no-match (`None`) rather than a silent default

use std::collections::HashMap;

use crate::config::RoutingConfig;
use crate::routing::matcher::{split_path, RoutePattern};
use crate::routing::{Method, RouteError};

/// A registered route: method, compiled pattern and whatever it dispatches to.
#[derive(Debug)]
pub struct RouteEntry<T> {
    pub method: Method,
    pub pattern: RoutePattern,
    pub target: T,
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a, T> {
    /// Position of the entry in registration order.
    pub index: usize,
    pub entry: &'a RouteEntry<T>,
    /// Capture name to matched path component. Values are never coerced.
    pub params: HashMap<String, String>,
}

/// Ordered table of routes.
#[derive(Debug)]
pub struct RouteTable<T> {
    entries: Vec<RouteEntry<T>>,
    options: RoutingConfig,
}

impl<T> RouteTable<T> {
    pub fn new(options: RoutingConfig) -> Self {
        Self {
            entries: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> &RoutingConfig {
        &self.options
    }

    /// Compile `pattern` and register it. Returns the entry index.
    pub fn register(&mut self, method: Method, pattern: &str, target: T) -> Result<usize, RouteError> {
        let compiled = RoutePattern::parse(pattern, &self.options)?;
        self.register_compiled(method, compiled, target)
    }

    /// Register an already compiled pattern.
    pub fn register_compiled(
        &mut self,
        method: Method,
        pattern: RoutePattern,
        target: T,
    ) -> Result<usize, RouteError> {
        if let Some(existing) = self
            .entries
            .iter()
            .find(|e| e.method == method && e.pattern.same_shape(&pattern))
        {
            return Err(RouteError::DuplicateRoute {
                method,
                pattern: pattern.as_str().to_string(),
                existing: existing.pattern.as_str().to_string(),
            });
        }

        tracing::debug!(method = %method, pattern = %pattern, "Route registered");
        self.entries.push(RouteEntry {
            method,
            pattern,
            target,
        });
        Ok(self.entries.len() - 1)
    }

    /// Find the first route, in registration order, matching `method` and `path`.
    pub fn resolve(&self, method: Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let components = split_path(path, &self.options);
        let entries = &self.entries;

        let scan = |wanted: Method| {
            entries.iter().enumerate().find_map(|(index, entry)| {
                if entry.method != wanted {
                    return None;
                }
                entry
                    .pattern
                    .matches(&components)
                    .map(|params| RouteMatch { index, entry, params })
            })
        };

        match scan(method) {
            Some(found) => Some(found),
            None if method == Method::Head => scan(Method::Get),
            None => None,
        }
    }

    /// Registered (method, pattern) pairs in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (Method, &str)> + '_ {
        self.entries.iter().map(|e| (e.method, e.pattern.as_str()))
    }

    pub fn get(&self, index: usize) -> Option<&RouteEntry<T>> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for RouteTable<T> {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}
