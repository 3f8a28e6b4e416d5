//! Authentication subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → interceptor.rs (excluded path? → pass through untouched)
//!     → Authorization header present?  no → 401
//!     → verifier.rs (token check over the identity RPC channel)
//!         rejected / unreachable / timed out → 401
//!     → identity.rs (inject X-* and Grpc-Metadata-X-* headers)
//!     → dispatcher
//! ```
//!
//! # Design Decisions
//! - Every rejection looks the same to the client
//! - Identity is request-scoped; nothing is cached between requests
//! - The verifier is a trait object so it can be replaced in tests

pub mod identity;
pub mod interceptor;
pub mod verifier;

pub use identity::Identity;
pub use interceptor::{auth_middleware, AuthDecision, AuthInterceptor, AuthOutcome, RejectReason};
pub use verifier::{GrpcIdentityVerifier, IdentityVerifier, VerifyError};
