//! Handler chain dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! IncomingRequest (method, path, query, headers, body)
//!     → dispatcher.rs (resolve via RouteTable)
//!     → effective chain = global middleware ++ route chain
//!     → request.rs (fresh Request + Context, params bound)
//!     → handler.rs (each handler: continue / respond / stall)
//!     → response.rs (first terminal write)
//!     → DispatchReport (Responded | NotFound | Stalled | NoResponse)
//! ```
//!
//! # Design Decisions
//! - Registration happens on `RouterBuilder`; serving uses the frozen `Dispatcher`
//! - Handlers are async; a slow handler only suspends its own request
//! - Per-step state is read off the token and sink after each handler returns

pub mod builder;
pub mod dispatcher;
pub mod handler;
pub mod request;
pub mod response;

pub use builder::{RouteGroup, RouterBuilder};
pub use dispatcher::{DispatchReport, Dispatcher, Outcome};
pub use handler::{async_handler_fn, handler_fn, BoxHandler, Chain, Handler, Next};
pub use request::{Context, IncomingRequest, Request};
pub use response::{Payload, Reply, Response};

use thiserror::Error;

use crate::routing::Method;

/// Request-time conditions. Contained per request, reported through logs
/// and [`DispatchReport`].
#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    #[error("no route matched {method} {path}")]
    NoRouteMatched { method: Method, path: String },

    #[error("handler {handler} of {route} neither continued nor responded")]
    StalledChain { route: String, handler: usize },

    #[error("handler {handler} of {route} continued {calls} times")]
    DoubleContinuation {
        route: String,
        handler: usize,
        calls: u32,
    },

    #[error("chain of {route} finished without a response")]
    NoResponse { route: String },
}
