//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the Axum router: one catch-all route behind the auth middleware
//! - Wire up request ID and tracing layers
//! - Serve until shutdown, then drain within a bounded grace period
//!
//! # Layer order (outermost first)
//! ```text
//! SetRequestId → Trace → PropagateRequestId → auth_middleware → dispatch
//! ```

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, middleware, routing::any, Router};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, Notify};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::auth::{auth_middleware, AuthInterceptor};
use crate::http::dispatch::{dispatch, Dispatcher};
use crate::http::request::{GatewayRequestId, RequestIdExt, X_REQUEST_ID};

/// The gateway's HTTP front end.
pub struct GatewayServer {
    router: Router,
    grace_period: Duration,
}

impl std::fmt::Debug for GatewayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayServer")
            .field("grace_period", &self.grace_period)
            .finish_non_exhaustive()
    }
}

impl GatewayServer {
    pub fn new(dispatcher: Dispatcher, interceptor: AuthInterceptor, grace_period: Duration) -> Self {
        Self {
            router: build_router(dispatcher, interceptor),
            grace_period,
        }
    }

    /// The fully layered router, for serving it elsewhere or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Accept connections on `listener` until `shutdown` fires.
    ///
    /// After the signal no new connections are accepted. In-flight requests
    /// get `grace_period` to finish; whatever is left after that is dropped.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Gateway listening");

        let draining = Arc::new(Notify::new());
        let signal = {
            let draining = draining.clone();
            async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown requested, draining in-flight requests");
                draining.notify_one();
            }
        };

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .into_future();

        let grace_period = self.grace_period;
        tokio::select! {
            result = serve => result?,
            _ = async {
                draining.notified().await;
                tokio::time::sleep(grace_period).await;
            } => {
                tracing::warn!(
                    grace_period_secs = grace_period.as_secs(),
                    "Grace period elapsed, abandoning in-flight requests"
                );
            }
        }

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

fn build_router(dispatcher: Dispatcher, interceptor: AuthInterceptor) -> Router {
    Router::new()
        .route("/", any(dispatch))
        .route("/{*path}", any(dispatch))
        .with_state(dispatcher)
        .layer(middleware::from_fn_with_state(interceptor, auth_middleware))
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                request_id = %request.request_id(),
                method = %request.method(),
                path = %request.uri().path(),
            )
        }))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, GatewayRequestId))
}
