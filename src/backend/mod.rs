//! Backend adapter subsystem.
//!
//! # Data Flow
//! ```text
//! BackendConfig[] (startup)
//!     → registry.rs (build every backend, fail fast)
//!         - http.rs: origin URL for the reverse proxy
//!         - rpc.rs: one shared tonic channel per RPC backend
//!     → HTTP backends referenced by the route table
//!     → RPC channels handed to the identity verifier and the transcoder
//! ```
//!
//! # Design Decisions
//! - One instance per backend; no load balancing
//! - Built once, never mutated after startup
//! - RPC channels are cloned, never re-dialed by the gateway

pub mod http;
pub mod registry;
pub mod rpc;

pub use http::HttpBackend;
pub use registry::{BackendError, BackendRegistry};
pub use rpc::RpcBackend;
