//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file, then environment overrides)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → consumed once at startup to build backends, routes and auth
//! ```
//!
//! # Design Decisions
//! - Config is read once; the routing table it produces never changes
//! - All fields have defaults so the gateway runs with no file at all
//! - Environment variables override file values, empty counts as unset
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AuthConfig, BackendConfig, BackendKind, GatewayConfig, HandlerKind, ListenerConfig, LogFormat,
    MatchKind, ObservabilityConfig, RouteConfig,
};
pub use validation::ValidationError;
