//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → CLI overrides (main.rs)
//!     → AppConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; routes are frozen with it
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{
    load_config, parse_config, read_config, resolve_config, ConfigError, ConfigOverrides,
};
pub use schema::{
    AppConfig, ListenerConfig, LogFormat, ObservabilityConfig, RoutingConfig, StaticFilesConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
