//! Registration-time API.
//!
//! Routes and global middleware are collected here during startup, then
//! frozen into an immutable [`Dispatcher`] before serving begins.

use crate::config::RoutingConfig;
use crate::dispatch::dispatcher::Dispatcher;
use crate::dispatch::handler::{BoxHandler, Chain};
use crate::routing::{Method, RouteError, RoutePattern, RouteTable};

/// Collects routes and global middleware.
pub struct RouterBuilder {
    table: RouteTable<Chain>,
    global: Vec<BoxHandler>,
}

impl RouterBuilder {
    pub fn new(options: RoutingConfig) -> Self {
        Self {
            table: RouteTable::new(options),
            global: Vec::new(),
        }
    }

    /// Append a handler that runs ahead of every route chain.
    ///
    /// Global middleware applies to all routes regardless of when it is
    /// registered relative to them.
    pub fn use_global(&mut self, handler: BoxHandler) -> &mut Self {
        self.global.push(handler);
        self
    }

    /// Register a route. Earlier registrations take precedence at lookup.
    pub fn route(&mut self, method: Method, pattern: &str, chain: Chain) -> Result<&mut Self, RouteError> {
        if chain.is_empty() {
            return Err(RouteError::EmptyChain {
                method,
                pattern: pattern.to_string(),
            });
        }
        self.table.register(method, pattern, chain)?;
        Ok(self)
    }

    pub fn get(&mut self, pattern: &str, chain: Chain) -> Result<&mut Self, RouteError> {
        self.route(Method::Get, pattern, chain)
    }

    pub fn post(&mut self, pattern: &str, chain: Chain) -> Result<&mut Self, RouteError> {
        self.route(Method::Post, pattern, chain)
    }

    /// Start a REST-style group: several methods under one pattern.
    ///
    /// The pattern is compiled once here; each method adds a distinct entry.
    pub fn group(&mut self, pattern: &str) -> Result<RouteGroup<'_>, RouteError> {
        let pattern = RoutePattern::parse(pattern, self.table.options())?;
        Ok(RouteGroup {
            table: &mut self.table,
            pattern,
        })
    }

    /// Freeze into a dispatcher.
    pub fn build(self) -> Dispatcher {
        tracing::info!(
            routes = self.table.len(),
            global_middleware = self.global.len(),
            "Router built"
        );
        Dispatcher::new(self.table, self.global)
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}

/// Methods registered under one shared pattern.
pub struct RouteGroup<'a> {
    table: &'a mut RouteTable<Chain>,
    pattern: RoutePattern,
}

impl RouteGroup<'_> {
    pub fn get(&mut self, chain: Chain) -> Result<&mut Self, RouteError> {
        self.on(Method::Get, chain)
    }

    pub fn post(&mut self, chain: Chain) -> Result<&mut Self, RouteError> {
        self.on(Method::Post, chain)
    }

    pub fn put(&mut self, chain: Chain) -> Result<&mut Self, RouteError> {
        self.on(Method::Put, chain)
    }

    pub fn delete(&mut self, chain: Chain) -> Result<&mut Self, RouteError> {
        self.on(Method::Delete, chain)
    }

    pub fn patch(&mut self, chain: Chain) -> Result<&mut Self, RouteError> {
        self.on(Method::Patch, chain)
    }

    pub fn on(&mut self, method: Method, chain: Chain) -> Result<&mut Self, RouteError> {
        if chain.is_empty() {
            return Err(RouteError::EmptyChain {
                method,
                pattern: self.pattern.as_str().to_string(),
            });
        }
        self.table.register_compiled(method, self.pattern.clone(), chain)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handler_fn;

    fn ok() -> Chain {
        vec![handler_fn(|_req, res, _next| res.send("ok"))]
    }

    #[test]
    fn test_group_registers_distinct_entries() {
        let mut builder = RouterBuilder::default();
        builder
            .group("/games/:id([0-9]+)")
            .unwrap()
            .get(ok())
            .unwrap()
            .put(ok())
            .unwrap()
            .delete(ok())
            .unwrap();

        let dispatcher = builder.build();
        let routes: Vec<_> = dispatcher.routes().routes().map(|(m, _)| m).collect();
        assert_eq!(routes, vec![Method::Get, Method::Put, Method::Delete]);
    }

    #[test]
    fn test_group_rejects_duplicate_method() {
        let mut builder = RouterBuilder::default();
        let mut group = builder.group("/games").unwrap();
        group.get(ok()).unwrap();
        assert!(matches!(group.get(ok()), Err(RouteError::DuplicateRoute { .. })));
    }

    #[test]
    fn test_errors_surface_at_registration() {
        let mut builder = RouterBuilder::default();
        assert!(matches!(
            builder.group("/games/:id(a|)"),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(matches!(
            builder.route(Method::Get, "/empty", Vec::new()),
            Err(RouteError::EmptyChain { .. })
        ));
        builder.get("/x", ok()).unwrap();
        assert!(matches!(builder.get("/x", ok()), Err(RouteError::DuplicateRoute { .. })));
    }
}
