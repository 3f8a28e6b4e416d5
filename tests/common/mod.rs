//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use api_gateway::auth::{Identity, IdentityVerifier, VerifyError};
use api_gateway::backend::{BackendRegistry, HttpBackend, RpcBackend};
use api_gateway::config::schema::{BLOGS_HTTP, IDENTITY_HTTP, IDENTITY_RPC, TOURS_HTTP, TOURS_RPC};
use api_gateway::config::GatewayConfig;
use api_gateway::lifecycle::{assemble_gateway, Shutdown};
use async_trait::async_trait;
use axum::{body::Body, extract::Request, Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tonic::transport::Endpoint;

/// What the echo backend saw.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, Vec<String>>,
    pub body: String,
}

impl Echo {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}

/// A running echo backend.
pub struct EchoBackend {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
}

impl EchoBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Start a backend that answers every request with a JSON [`Echo`].
///
/// Requests carrying `x-echo-delay-ms` are held that long before answering.
pub async fn start_echo_backend() -> EchoBackend {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    let app = Router::new().fallback(move |request: Request<Body>| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let (parts, body) = request.into_parts();

            if let Some(delay) = parts
                .headers
                .get("x-echo-delay-ms")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
            {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let mut headers: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for (name, value) in &parts.headers {
                headers
                    .entry(name.as_str().to_string())
                    .or_default()
                    .push(value.to_str().unwrap_or_default().to_string());
            }
            let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

            Json(Echo {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                headers,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        }
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    EchoBackend { addr, hits }
}

/// Accepts "Bearer xyz" and "Bearer <user_id>", rejects everything else.
///
/// "xyz" is user 42, person 7. Numeric tokens map to person id
/// `user_id + 1000`. "Bearer slow-<user_id>" waits before answering.
/// The role is always "tourist".
#[derive(Default)]
pub struct FakeVerifier {
    pub calls: AtomicUsize,
}

#[async_trait]
impl IdentityVerifier for FakeVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let raw = token.strip_prefix("Bearer ").ok_or(VerifyError::InvalidToken)?;
        let raw = match raw.strip_prefix("slow-") {
            Some(rest) => {
                tokio::time::sleep(Duration::from_millis(50)).await;
                rest
            }
            None => raw,
        };
        if raw == "xyz" {
            return Ok(Identity {
                role: "tourist".to_string(),
                user_id: 42,
                person_id: 7,
            });
        }
        let user_id: i64 = raw.parse().map_err(|_| VerifyError::InvalidToken)?;
        Ok(Identity {
            role: "tourist".to_string(),
            user_id,
            person_id: user_id + 1000,
        })
    }
}

/// A running gateway.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// HTTP client that never goes through a system proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Reserve a port and release it, so nothing is listening there.
pub fn dead_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Start a gateway with the default routing table, all HTTP backends
/// pointing at `backend`, and RPC backends pointing at a dead port.
pub async fn start_gateway(
    backend: &EchoBackend,
    verifier: Arc<FakeVerifier>,
    grace_period_secs: u64,
) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.shutdown.grace_period_secs = grace_period_secs;

    let mut registry = BackendRegistry::new();
    for name in [IDENTITY_HTTP, TOURS_HTTP, BLOGS_HTTP] {
        registry.insert_http(HttpBackend::new(name, &backend.url()).unwrap());
    }
    let rpc_addr = dead_address();
    for name in [IDENTITY_RPC, TOURS_RPC] {
        let channel = Endpoint::from_shared(format!("http://{rpc_addr}"))
            .unwrap()
            .connect_lazy();
        registry.insert_rpc(RpcBackend::from_channel(name, rpc_addr.to_string(), channel));
    }

    let server = assemble_gateway(&config, &registry, verifier).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let handle = tokio::spawn(server.run(listener, signal));

    TestGateway {
        addr,
        shutdown,
        handle,
    }
}
