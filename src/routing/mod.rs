//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     (method, "/games/:id([0-9]+)", chain)
//!     → matcher.rs (split on '/', classify literal / capture / constraint)
//!     → router.rs (duplicate check, append in registration order)
//!     → Freeze as immutable RouteTable
//!
//! Incoming Request (method, path)
//!     → matcher.rs (split path, decode captured values)
//!     → router.rs (first entry in registration order that matches)
//!     → Return: RouteMatch with captures, or no match
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Regex only for constraints that are neither word lists nor digit runs
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by registration)

pub mod matcher;
pub mod method;
pub mod router;

pub use matcher::{Constraint, RoutePattern, Segment};
pub use method::Method;
pub use router::{RouteEntry, RouteMatch, RouteTable};

use thiserror::Error;

/// Registration-time routing errors. Surfaced to the registering code immediately.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("duplicate route {method} {pattern} (conflicts with {existing})")]
    DuplicateRoute {
        method: Method,
        pattern: String,
        existing: String,
    },

    #[error("route {method} {pattern} has no handlers")]
    EmptyChain { method: Method, pattern: String },

    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}
