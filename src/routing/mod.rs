//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (tiered lookup)
//!     → matcher.rs (exact / prefix comparison)
//!     → Return: Transcode, Proxy(backend) or NotFound
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Resolve backend names
//!     → Split into transcoding tier and reverse-proxy tier
//!     → Freeze as immutable RouteClassifier
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (byte comparison only)
//! - Deterministic: same path always yields the same route

pub mod matcher;
pub mod router;

pub use router::{Route, RouteClassifier, RouteError, RouteRule, RouteTarget};
