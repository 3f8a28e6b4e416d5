//! Startup orchestration.
//!
//! # Order
//! 1. Dial every backend (RPC channels eagerly, with a deadline)
//! 2. Register the transcoded RPC services on their channels
//! 3. Compile the routing table against the HTTP backends
//! 4. Build the verifier, interceptor and dispatcher
//!
//! Any failure is fatal; the listener is bound only after all of this.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthInterceptor, GrpcIdentityVerifier, IdentityVerifier};
use crate::backend::{BackendError, BackendRegistry};
use crate::config::schema::{IDENTITY_RPC, TOURS_RPC};
use crate::config::GatewayConfig;
use crate::http::{Dispatcher, GatewayServer, ReverseProxy};
use crate::routing::{RouteClassifier, RouteError};
use crate::rpc::bindings::{
    register_auth_service, register_person_service, register_tour_execution_service,
    register_user_service,
};
use crate::rpc::{RegistrationError, Transcoder};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("required RPC backend `{0}` is not configured")]
    MissingRpcBackend(String),
    #[error("failed to register transcoded operation: {0}")]
    Registration(#[from] RegistrationError),
    #[error("invalid routing table: {0}")]
    Routes(#[from] RouteError),
}

/// Connect to every backend and build the gateway.
pub async fn build_gateway(config: &GatewayConfig) -> Result<GatewayServer, StartupError> {
    let connect_timeout = Duration::from_secs(config.timeouts.rpc_connect_secs);
    let registry = BackendRegistry::connect(&config.backends, connect_timeout).await?;

    let verifier_channel = registry
        .rpc(&config.auth.verifier_backend)
        .ok_or_else(|| StartupError::MissingRpcBackend(config.auth.verifier_backend.clone()))?
        .channel();
    let verifier = GrpcIdentityVerifier::new(
        verifier_channel,
        Duration::from_millis(config.auth.verify_timeout_ms),
    );

    assemble_gateway(config, &registry, Arc::new(verifier))
}

/// Build the gateway from already-established backends.
pub fn assemble_gateway(
    config: &GatewayConfig,
    registry: &BackendRegistry,
    verifier: Arc<dyn IdentityVerifier>,
) -> Result<GatewayServer, StartupError> {
    let rpc_channel = |name: &str| {
        registry
            .rpc(name)
            .map(|backend| backend.channel())
            .ok_or_else(|| StartupError::MissingRpcBackend(name.to_string()))
    };

    let mut transcoder = Transcoder::new(config.transcoding.max_body_bytes);
    let identity = rpc_channel(IDENTITY_RPC)?;
    register_auth_service(&mut transcoder, identity.clone())?;
    register_user_service(&mut transcoder, identity.clone())?;
    register_person_service(&mut transcoder, identity)?;
    register_tour_execution_service(&mut transcoder, rpc_channel(TOURS_RPC)?)?;

    let classifier = RouteClassifier::from_config(&config.routes, registry)?;
    for rule in classifier.rules() {
        tracing::debug!(
            pattern = rule.pattern(),
            handler = ?rule.target().handler_kind(),
            "Route registered"
        );
    }

    let interceptor = AuthInterceptor::new(verifier, config.auth.excluded_paths.iter().cloned());
    let dispatcher = Dispatcher::new(classifier, transcoder, ReverseProxy::new());

    tracing::info!(
        routes = config.routes.len(),
        excluded_paths = config.auth.excluded_paths.len(),
        "Gateway assembled"
    );

    Ok(GatewayServer::new(
        dispatcher,
        interceptor,
        Duration::from_secs(config.shutdown.grace_period_secs),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{HttpBackend, RpcBackend};
    use crate::config::schema::{BLOGS_HTTP, IDENTITY_HTTP, TOURS_HTTP};
    use tonic::transport::Endpoint;

    fn lazy_rpc(name: &str) -> RpcBackend {
        let channel = Endpoint::from_static("http://127.0.0.1:1").connect_lazy();
        RpcBackend::from_channel(name, "127.0.0.1:1", channel)
    }

    fn registry(with_tours_rpc: bool) -> BackendRegistry {
        let mut registry = BackendRegistry::new();
        for (name, addr) in [
            (IDENTITY_HTTP, "http://localhost:8080"),
            (TOURS_HTTP, "http://localhost:8081"),
            (BLOGS_HTTP, "http://localhost:8083"),
        ] {
            registry.insert_http(HttpBackend::new(name, addr).unwrap());
        }
        registry.insert_rpc(lazy_rpc(IDENTITY_RPC));
        if with_tours_rpc {
            registry.insert_rpc(lazy_rpc(TOURS_RPC));
        }
        registry
    }

    fn verifier() -> Arc<dyn IdentityVerifier> {
        let channel = Endpoint::from_static("http://127.0.0.1:1").connect_lazy();
        Arc::new(GrpcIdentityVerifier::new(channel, Duration::from_secs(1)))
    }

    #[tokio::test]
    async fn test_assemble_with_default_config() {
        let config = GatewayConfig::default();
        assert!(assemble_gateway(&config, &registry(true), verifier()).is_ok());
    }

    #[tokio::test]
    async fn test_missing_rpc_backend_is_fatal() {
        let config = GatewayConfig::default();
        let err = assemble_gateway(&config, &registry(false), verifier()).unwrap_err();
        assert_eq!(err.to_string(), "required RPC backend `tours-rpc` is not configured");
        assert!(matches!(err, StartupError::MissingRpcBackend(name) if name == TOURS_RPC));
    }

    #[tokio::test]
    async fn test_unreachable_rpc_backend_fails_startup() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = GatewayConfig::default();
        config.timeouts.rpc_connect_secs = 1;
        for backend in &mut config.backends {
            if backend.name == IDENTITY_RPC || backend.name == TOURS_RPC {
                backend.address = addr.to_string();
            }
        }

        let err = build_gateway(&config).await.err().unwrap();
        assert!(matches!(err, StartupError::Backend(BackendError::Rpc { .. })));
    }
}
