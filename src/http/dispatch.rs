//! Request dispatch.
//!
//! Classifies each (already authenticated) request and hands it to the
//! transcoding engine or the reverse proxy. Owns no per-request state.

use std::sync::Arc;
use std::time::Instant;

use axum::{body::Body, extract::State, http::Request, response::Response};

use crate::http::proxy::ReverseProxy;
use crate::http::request::RequestIdExt;
use crate::http::response::not_found;
use crate::observability::metrics;
use crate::routing::{Route, RouteClassifier};
use crate::rpc::Transcoder;

/// Shared state behind the catch-all handler.
#[derive(Clone)]
pub struct Dispatcher {
    classifier: Arc<RouteClassifier>,
    transcoder: Arc<Transcoder>,
    proxy: ReverseProxy,
}

impl Dispatcher {
    pub fn new(classifier: RouteClassifier, transcoder: Transcoder, proxy: ReverseProxy) -> Self {
        Self {
            classifier: Arc::new(classifier),
            transcoder: Arc::new(transcoder),
            proxy,
        }
    }

    /// Serve one request through the handler its path selects.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let route = self.classifier.classify(request.uri().path());
        let handler = route.label();

        tracing::debug!(
            request_id = %request.request_id(),
            method = %request.method(),
            path = %request.uri().path(),
            route = ?route,
            "Dispatching request"
        );

        let response = match route {
            Route::Transcode => self.transcoder.handle(request).await,
            Route::Proxy(backend) => self.proxy.forward(backend, request).await,
            Route::NotFound => not_found(),
        };

        metrics::record_request(handler, response.status().as_u16(), start);
        response
    }
}

/// Catch-all axum handler.
pub async fn dispatch(State(dispatcher): State<Dispatcher>, request: Request<Body>) -> Response {
    dispatcher.handle(request).await
}
