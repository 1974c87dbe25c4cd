//! Minimal HTTP request router with chained, short-circuitable middleware.
//!
//! Routes are registered on a [`RouterBuilder`](dispatch::RouterBuilder),
//! frozen into a [`Dispatcher`](dispatch::Dispatcher) and served through the
//! axum front end in [`http`].

pub mod app;
pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use dispatch::{Dispatcher, RouterBuilder};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Method, RouteError};
