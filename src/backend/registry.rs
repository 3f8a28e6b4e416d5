//! Backend registry.
//!
//! # Responsibilities
//! - Build every configured backend once at startup
//! - Look backends up by name for routes, the verifier and the transcoder

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::http::{HttpBackend, HttpBackendError};
use crate::backend::rpc::{RpcBackend, RpcDialError};
use crate::config::{BackendConfig, BackendKind};

/// Error building the backend registry.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend `{name}`: {source}")]
    Http {
        name: String,
        #[source]
        source: HttpBackendError,
    },
    #[error("backend `{name}`: {source}")]
    Rpc {
        name: String,
        #[source]
        source: RpcDialError,
    },
}

/// All backends known to the gateway, keyed by name.
#[derive(Debug, Default)]
pub struct BackendRegistry {
    http: HashMap<String, Arc<HttpBackend>>,
    rpc: HashMap<String, RpcBackend>,
}

impl BackendRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every backend in `configs`, dialing RPC backends in order.
    ///
    /// The first failure aborts startup.
    pub async fn connect(
        configs: &[BackendConfig],
        connect_timeout: Duration,
    ) -> Result<Self, BackendError> {
        let mut registry = Self::new();

        for config in configs {
            match config.kind {
                BackendKind::Http => {
                    let backend = HttpBackend::new(&config.name, &config.address).map_err(
                        |source| BackendError::Http {
                            name: config.name.clone(),
                            source,
                        },
                    )?;
                    registry.insert_http(backend);
                }
                BackendKind::Rpc => {
                    let backend = RpcBackend::connect(&config.name, &config.address, connect_timeout)
                        .await
                        .map_err(|source| BackendError::Rpc {
                            name: config.name.clone(),
                            source,
                        })?;
                    tracing::info!(
                        backend = %config.name,
                        address = %config.address,
                        "RPC channel established"
                    );
                    registry.insert_rpc(backend);
                }
            }
        }

        Ok(registry)
    }

    pub fn insert_http(&mut self, backend: HttpBackend) {
        self.http.insert(backend.name().to_string(), Arc::new(backend));
    }

    pub fn insert_rpc(&mut self, backend: RpcBackend) {
        self.rpc.insert(backend.name().to_string(), backend);
    }

    pub fn http(&self, name: &str) -> Option<Arc<HttpBackend>> {
        self.http.get(name).cloned()
    }

    pub fn rpc(&self, name: &str) -> Option<&RpcBackend> {
        self.rpc.get(name)
    }
}
