//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.
//! Defaults reproduce the standard deployment: five backends, the fixed
//! route table and the unauthenticated endpoints.

use serde::{Deserialize, Serialize};

/// Name of the identity/stakeholder RPC backend.
pub const IDENTITY_RPC: &str = "identity-rpc";
/// Name of the identity/stakeholder HTTP backend.
pub const IDENTITY_HTTP: &str = "identity-http";
/// Name of the tour service RPC backend.
pub const TOURS_RPC: &str = "tours-rpc";
/// Name of the tour service HTTP backend.
pub const TOURS_HTTP: &str = "tours-http";
/// Name of the blog service HTTP backend.
pub const BLOGS_HTTP: &str = "blogs-http";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend definitions, referenced by name from routes and auth.
    pub backends: Vec<BackendConfig>,

    /// Route definitions. Transcoding rules always take precedence over
    /// reverse-proxy rules, whatever their position in this list.
    pub routes: Vec<RouteConfig>,

    /// Authentication settings.
    pub auth: AuthConfig,

    /// Transcoding engine settings.
    pub transcoding: TranscodingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Shutdown behaviour.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            backends: default_backends(),
            routes: default_routes(),
            auth: AuthConfig::default(),
            transcoding: TranscodingConfig::default(),
            timeouts: TimeoutConfig::default(),
            shutdown: ShutdownConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Look up a backend definition by name.
    pub fn backend(&self, name: &str) -> Option<&BackendConfig> {
        self.backends.iter().find(|b| b.name == name)
    }

    /// Mutable lookup, used by environment overrides.
    pub fn backend_mut(&mut self, name: &str) -> Option<&mut BackendConfig> {
        self.backends.iter_mut().find(|b| b.name == name)
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:7070"). Host names are resolved at bind time.
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "localhost:7070".to_string(),
        }
    }
}

/// Transport used to reach a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Binary RPC (gRPC) over one long-lived channel.
    Rpc,
    /// Plain HTTP, reverse-proxied.
    Http,
}

/// Backend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Unique backend identifier.
    pub name: String,

    /// Transport kind.
    pub kind: BackendKind,

    /// For `http`: an origin URL such as "http://localhost:8080".
    /// For `rpc`: "host:port", optionally with an "http://" scheme.
    pub address: String,
}

impl BackendConfig {
    pub fn new(name: impl Into<String>, kind: BackendKind, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            address: address.into(),
        }
    }
}

/// How a route pattern is compared against the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Path must equal the pattern byte for byte.
    Exact,
    /// Path must start with the pattern.
    #[default]
    Prefix,
}

/// Which handler serves a matched request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    /// JSON to RPC transcoding engine.
    Transcoding,
    /// Plain reverse proxy to an HTTP backend.
    ReverseProxy,
}

/// Route configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern (no wildcards).
    pub path: String,

    /// Exact or prefix match.
    #[serde(rename = "match", default)]
    pub match_kind: MatchKind,

    /// Handler serving the route.
    pub handler: HandlerKind,

    /// HTTP backend name; required for `reverse_proxy`, absent for `transcoding`.
    #[serde(default)]
    pub backend: Option<String>,
}

impl RouteConfig {
    /// A transcoding rule matching by prefix.
    pub fn transcoding(prefix: impl Into<String>) -> Self {
        Self {
            path: prefix.into(),
            match_kind: MatchKind::Prefix,
            handler: HandlerKind::Transcoding,
            backend: None,
        }
    }

    /// A reverse-proxy rule.
    pub fn proxy(path: impl Into<String>, match_kind: MatchKind, backend: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            match_kind,
            handler: HandlerKind::ReverseProxy,
            backend: Some(backend.into()),
        }
    }
}

/// Authentication configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Paths served without authentication (exact match only).
    pub excluded_paths: Vec<String>,

    /// RPC backend hosting the token-check operation.
    pub verifier_backend: String,

    /// Upper bound on a single token check, in milliseconds.
    pub verify_timeout_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            excluded_paths: vec![
                "/api/auth/validate".to_string(),
                "/api/auth/login".to_string(),
                "/api/auth".to_string(),
                "/api/blogs".to_string(),
            ],
            verifier_backend: IDENTITY_RPC.to_string(),
            verify_timeout_ms: 3_000,
        }
    }
}

/// Transcoding engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranscodingConfig {
    /// Largest JSON request body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl Default for TranscodingConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

/// Timeout configuration for startup operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for establishing each RPC channel at startup, in seconds.
    pub rpc_connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { rpc_connect_secs: 5 }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long in-flight requests may run after a termination signal.
    pub grace_period_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            grace_period_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::new(IDENTITY_RPC, BackendKind::Rpc, "127.0.0.1:8888"),
        BackendConfig::new(IDENTITY_HTTP, BackendKind::Http, "http://localhost:8080"),
        BackendConfig::new(TOURS_RPC, BackendKind::Rpc, "127.0.0.1:8889"),
        BackendConfig::new(TOURS_HTTP, BackendKind::Http, "http://localhost:8081"),
        BackendConfig::new(BLOGS_HTTP, BackendKind::Http, "http://localhost:8083"),
    ]
}

fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig::transcoding("/api/auth"),
        RouteConfig::transcoding("/api/tours/tour-executions/abandon"),
        RouteConfig::transcoding("/api/tours/tour-executions/complete"),
        RouteConfig::proxy("/api/users", MatchKind::Exact, IDENTITY_HTTP),
        RouteConfig::proxy("/api/users/", MatchKind::Prefix, IDENTITY_HTTP),
        RouteConfig::proxy("/api/profile", MatchKind::Exact, IDENTITY_HTTP),
        RouteConfig::proxy("/api/profile/", MatchKind::Prefix, IDENTITY_HTTP),
        RouteConfig::proxy("/api/tours", MatchKind::Exact, TOURS_HTTP),
        RouteConfig::proxy("/api/tours/", MatchKind::Prefix, TOURS_HTTP),
        RouteConfig::proxy("/api/blogs", MatchKind::Exact, BLOGS_HTTP),
        RouteConfig::proxy("/api/blogs/", MatchKind::Prefix, BLOGS_HTTP),
    ]
}
