//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → auth middleware (crate::auth)
//!     → dispatch.rs (classify path)
//!         → transcoding engine (crate::rpc)
//!         → proxy.rs (forward to HTTP backend)
//!         → response.rs (404)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::Dispatcher;
pub use proxy::ReverseProxy;
pub use request::{GatewayRequestId, RequestIdExt, X_REQUEST_ID};
pub use server::GatewayServer;
