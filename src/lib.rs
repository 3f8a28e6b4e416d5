//! Edge API gateway library.
//!
//! Accepts HTTP/JSON traffic, authenticates it against the identity
//! service, and serves it either by transcoding to RPC or by reverse
//! proxying to an HTTP backend.

// Core subsystems
pub mod auth;
pub mod backend;
pub mod config;
pub mod http;
pub mod routing;
pub mod rpc;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
