//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span, deadline)
//!     → request.rs (method/query/body → IncomingRequest)
//!     → dispatch (route table + handler chain)
//!     → response.rs (DispatchReport → status, headers, body or file)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestRejection, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
