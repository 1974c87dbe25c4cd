//! Chain execution.
//!
//! # Responsibilities
//! - Resolve the request through the route table
//! - Run global middleware, then the route chain, one handler at a time
//! - Classify each step as continue, responded or stalled
//! - Report not-found, stalled and no-response outcomes distinctly
//!
//! # Design Decisions
//! - Route table and global middleware are frozen at build time and only read here
//! - One `Request`/`Response` pair per dispatch; nothing is shared across requests
//! - A handler that both responds and continues ends the chain (response wins)
//! - No timeout here: the server layer bounds each request

use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::handler::{BoxHandler, Chain, Next};
use crate::dispatch::request::{IncomingRequest, Request};
use crate::dispatch::response::{Reply, Response};
use crate::dispatch::DispatchError;
use crate::observability::metrics;
use crate::routing::{Method, RouteEntry, RouteTable};

/// Terminal state of one dispatch.
#[derive(Debug)]
pub enum Outcome {
    /// No route matched the method and path.
    NotFound,
    /// A handler wrote a response.
    Responded(Reply),
    /// The handler at `handler` (index in the effective chain) returned
    /// without continuing or responding.
    Stalled { handler: usize },
    /// Every handler continued and none responded.
    NoResponse,
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::NotFound => "not_found",
            Outcome::Responded(_) => "responded",
            Outcome::Stalled { .. } => "stalled",
            Outcome::NoResponse => "no_response",
        }
    }
}

/// Outcome plus what happened along the way.
#[derive(Debug)]
pub struct DispatchReport {
    pub outcome: Outcome,
    /// `"GET /games/:id([0-9]+)"` for the matched route, if any.
    pub route: Option<String>,
    /// Number of handlers that were invoked.
    pub handlers_run: usize,
    /// Handler defects that did not end the chain.
    pub defects: Vec<DispatchError>,
}

impl DispatchReport {
    /// Request-time error for outcomes that are not a response.
    pub fn error(&self, method: Method, path: &str) -> Option<DispatchError> {
        match &self.outcome {
            Outcome::NotFound => Some(DispatchError::NoRouteMatched {
                method,
                path: path.to_string(),
            }),
            Outcome::Stalled { handler } => Some(DispatchError::StalledChain {
                route: self.route.clone().unwrap_or_default(),
                handler: *handler,
            }),
            Outcome::NoResponse => Some(DispatchError::NoResponse {
                route: self.route.clone().unwrap_or_default(),
            }),
            Outcome::Responded(_) => None,
        }
    }
}

/// Runs resolved handler chains.
///
/// Cheap to clone; clones share the frozen route table.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable<Chain>>,
    global: Arc<[BoxHandler]>,
}

impl Dispatcher {
    pub fn new(table: RouteTable<Chain>, global: Vec<BoxHandler>) -> Self {
        Self {
            table: Arc::new(table),
            global: global.into(),
        }
    }

    pub fn routes(&self) -> &RouteTable<Chain> {
        &self.table
    }

    pub fn global_middleware(&self) -> usize {
        self.global.len()
    }

    /// Resolve and run the chain for one request.
    pub async fn dispatch(&self, incoming: IncomingRequest) -> DispatchReport {
        let start = Instant::now();

        let Some(found) = self.table.resolve(incoming.method, &incoming.path) else {
            tracing::debug!(method = %incoming.method, path = %incoming.path, "No route matched");
            let report = DispatchReport {
                outcome: Outcome::NotFound,
                route: None,
                handlers_run: 0,
                defects: Vec::new(),
            };
            metrics::record_dispatch(report.outcome.label(), start);
            return report;
        };

        let route = route_name(found.entry);
        tracing::debug!(
            route = %route,
            path = %incoming.path,
            params = ?found.params,
            "Route matched"
        );

        let mut req = Request::new(incoming, found.params);
        let report = self.run_chain(&route, found.entry, &mut req).await;
        metrics::record_dispatch(report.outcome.label(), start);
        report
    }

    async fn run_chain(&self, route: &str, entry: &RouteEntry<Chain>, req: &mut Request) -> DispatchReport {
        let mut res = Response::new();
        let mut defects = Vec::new();
        let mut handlers_run = 0;

        let chain = self.global.iter().chain(entry.target.iter());
        for (index, handler) in chain.enumerate() {
            let mut next = Next::new();
            handler.call(req, &mut res, &mut next).await;
            handlers_run += 1;

            if next.calls() > 1 {
                tracing::warn!(
                    route = %route,
                    handler = index,
                    calls = next.calls(),
                    "Handler continued more than once"
                );
                defects.push(DispatchError::DoubleContinuation {
                    route: route.to_string(),
                    handler: index,
                    calls: next.calls(),
                });
            }

            if res.is_sent() {
                break;
            }

            if next.calls() == 0 {
                tracing::warn!(
                    route = %route,
                    handler = index,
                    "Handler neither continued nor responded"
                );
                return DispatchReport {
                    outcome: Outcome::Stalled { handler: index },
                    route: Some(route.to_string()),
                    handlers_run,
                    defects,
                };
            }
        }

        let outcome = match res.into_reply() {
            Some(reply) => Outcome::Responded(reply),
            None => {
                tracing::debug!(route = %route, "Chain finished without a response");
                Outcome::NoResponse
            }
        };

        DispatchReport {
            outcome,
            route: Some(route.to_string()),
            handlers_run,
            defects,
        }
    }
}

fn route_name(entry: &RouteEntry<Chain>) -> String {
    format!("{} {}", entry.method, entry.pattern)
}
