//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (routes and auth reference existing backends)
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{BackendKind, GatewayConfig, HandlerKind};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,
    #[error("backend `{0}` is defined more than once")]
    DuplicateBackend(String),
    #[error("backend `{name}` has invalid address `{address}`: {reason}")]
    InvalidBackendAddress {
        name: String,
        address: String,
        reason: String,
    },
    #[error("route path `{0}` must start with '/'")]
    InvalidRoutePath(String),
    #[error("reverse-proxy route `{0}` must name a backend")]
    MissingRouteBackend(String),
    #[error("transcoding route `{0}` must not name a backend")]
    UnexpectedRouteBackend(String),
    #[error("route `{path}` references unknown HTTP backend `{backend}`")]
    UnknownRouteBackend { path: String, backend: String },
    #[error("excluded path `{0}` must start with '/'")]
    InvalidExcludedPath(String),
    #[error("auth.verifier_backend `{0}` is not a configured RPC backend")]
    InvalidVerifierBackend(String),
    #[error("observability.metrics_address `{address}` is not a socket address: {reason}")]
    InvalidMetricsAddress { address: String, reason: String },
    #[error("{0} must be greater than zero")]
    ZeroValue(&'static str),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.trim().is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    let mut seen = HashSet::new();
    for backend in &config.backends {
        if !seen.insert(backend.name.as_str()) {
            errors.push(ValidationError::DuplicateBackend(backend.name.clone()));
        }
        if let Err(reason) = check_address(backend.kind, &backend.address) {
            errors.push(ValidationError::InvalidBackendAddress {
                name: backend.name.clone(),
                address: backend.address.clone(),
                reason,
            });
        }
    }

    for route in &config.routes {
        if !route.path.starts_with('/') {
            errors.push(ValidationError::InvalidRoutePath(route.path.clone()));
        }
        match (route.handler, &route.backend) {
            (HandlerKind::ReverseProxy, None) => {
                errors.push(ValidationError::MissingRouteBackend(route.path.clone()));
            }
            (HandlerKind::ReverseProxy, Some(name)) => {
                let is_http = config
                    .backend(name)
                    .is_some_and(|b| b.kind == BackendKind::Http);
                if !is_http {
                    errors.push(ValidationError::UnknownRouteBackend {
                        path: route.path.clone(),
                        backend: name.clone(),
                    });
                }
            }
            (HandlerKind::Transcoding, Some(_)) => {
                errors.push(ValidationError::UnexpectedRouteBackend(route.path.clone()));
            }
            (HandlerKind::Transcoding, None) => {}
        }
    }

    for path in &config.auth.excluded_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::InvalidExcludedPath(path.clone()));
        }
    }

    let verifier_is_rpc = config
        .backend(&config.auth.verifier_backend)
        .is_some_and(|b| b.kind == BackendKind::Rpc);
    if !verifier_is_rpc {
        errors.push(ValidationError::InvalidVerifierBackend(
            config.auth.verifier_backend.clone(),
        ));
    }

    if config.auth.verify_timeout_ms == 0 {
        errors.push(ValidationError::ZeroValue("auth.verify_timeout_ms"));
    }
    if config.timeouts.rpc_connect_secs == 0 {
        errors.push(ValidationError::ZeroValue("timeouts.rpc_connect_secs"));
    }
    if config.transcoding.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue("transcoding.max_body_bytes"));
    }

    if config.observability.metrics_enabled {
        let address = &config.observability.metrics_address;
        if let Err(e) = address.parse::<SocketAddr>() {
            errors.push(ValidationError::InvalidMetricsAddress {
                address: address.clone(),
                reason: e.to_string(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(kind: BackendKind, address: &str) -> Result<(), String> {
    match kind {
        BackendKind::Http => {
            let url = Url::parse(address).map_err(|e| e.to_string())?;
            if url.scheme() != "http" {
                return Err(format!("unsupported scheme `{}`", url.scheme()));
            }
            if url.host_str().is_none() {
                return Err("missing host".to_string());
            }
            Ok(())
        }
        BackendKind::Rpc if address.trim().is_empty() => Err("empty address".to_string()),
        BackendKind::Rpc => Ok(()),
    }
}
