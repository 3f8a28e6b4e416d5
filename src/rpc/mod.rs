//! RPC subsystem.
//!
//! # Data Flow
//! ```text
//! JSON request on a transcoding route
//!     → transcoder.rs (binding lookup by method + exact path)
//!     → JSON body → prost message, headers → metadata
//!     → client.rs (unary call over the shared channel)
//!     → response message → JSON, metadata → Grpc-Metadata-* headers
//!
//! Startup:
//!     bindings.rs registers each service against its backend channel
//! ```
//!
//! # Design Decisions
//! - Unary calls only; streaming RPCs are not exposed over HTTP
//! - Messages and clients are hand-written in generated-code shape, so
//!   building needs no protoc

pub mod bindings;
pub mod client;
pub mod proto;
pub mod transcoder;

pub use client::{
    AuthServiceClient, PersonServiceClient, TourExecutionServiceClient, UserServiceClient,
};
pub use transcoder::{RegistrationError, Transcoder};
