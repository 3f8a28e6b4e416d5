//! Reverse proxy forwarding.
//!
//! # Responsibilities
//! - Rewrite the request onto the backend origin
//! - Strip hop-by-hop headers in both directions
//! - Append the client address to `X-Forwarded-For`
//! - Stream the backend response back unmodified
//!
//! # Design Decisions
//! - One pooled client shared by every backend
//! - No retries: a failed forward is a 502 with an empty body
//! - The inbound `Host` header is forwarded as received

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, HeaderName, HeaderValue, Request, Version},
    response::Response,
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::backend::HttpBackend;
use crate::http::request::RequestIdExt;
use crate::http::response::{bad_gateway, strip_hop_by_hop};

pub const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

/// Forwards requests to HTTP backends.
#[derive(Clone, Debug)]
pub struct ReverseProxy {
    client: Client<HttpConnector, Body>,
}

impl Default for ReverseProxy {
    fn default() -> Self {
        Self::new()
    }
}

impl ReverseProxy {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client }
    }

    /// Forward `request` to `backend` and return its response.
    pub async fn forward(&self, backend: &HttpBackend, request: Request<Body>) -> Response {
        let request_id = request.request_id().to_string();
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        let (mut parts, body) = request.into_parts();
        parts.uri = match backend.upstream_uri(&parts.uri) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    backend = backend.name(),
                    error = %e,
                    "Cannot build upstream URI"
                );
                return bad_gateway();
            }
        };
        parts.version = Version::HTTP_11;
        strip_hop_by_hop(&mut parts.headers);
        if let Some(peer) = peer {
            append_forwarded_for(&mut parts.headers, peer);
        }

        let upstream = Request::from_parts(parts, body);
        tracing::debug!(
            request_id = %request_id,
            backend = backend.name(),
            uri = %upstream.uri(),
            "Forwarding request"
        );

        match self.client.request(upstream).await {
            Ok(response) => downstream_response(response),
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    backend = backend.name(),
                    origin = %backend.origin(),
                    error = %e,
                    "Upstream request failed"
                );
                bad_gateway()
            }
        }
    }
}

fn downstream_response(response: hyper::Response<Incoming>) -> Response {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}

/// Append `peer`'s IP to any existing `X-Forwarded-For` chain.
fn append_forwarded_for(headers: &mut HeaderMap, peer: SocketAddr) {
    let ip = peer.ip().to_string();
    let prior: Vec<&str> = headers
        .get_all(X_FORWARDED_FOR)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    let chain = if prior.is_empty() {
        ip
    } else {
        format!("{}, {}", prior.join(", "), ip)
    };

    if let Ok(value) = HeaderValue::from_str(&chain) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}
