//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher and HTTP layer produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (dispatch counters, latency histogram)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through the HTTP trace span
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
