//! Authentication middleware.
//!
//! Runs in front of the dispatcher. Excluded paths pass through untouched;
//! every other request needs an `Authorization` header the identity service
//! accepts, and leaves with the caller's identity in its headers.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};

use crate::auth::identity::Identity;
use crate::auth::verifier::{IdentityVerifier, VerifyError};
use crate::http::response;
use crate::observability::metrics;

/// Why a request was turned away.
#[derive(Debug)]
pub enum RejectReason {
    MissingToken,
    Verification(VerifyError),
    /// The verifier answered with an identity that cannot be encoded as headers.
    UnencodableIdentity,
}

impl RejectReason {
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::MissingToken => "missing_token",
            RejectReason::Verification(e) => e.label(),
            RejectReason::UnencodableIdentity => "unencodable_identity",
        }
    }
}

/// Result of authentication for one request.
#[derive(Debug)]
pub enum AuthOutcome {
    Bypassed,
    Authenticated(Identity),
    Rejected(RejectReason),
}

/// Computed once per request and consumed immediately.
#[derive(Debug)]
pub struct AuthDecision {
    pub required: bool,
    pub outcome: AuthOutcome,
}

/// Decides and applies authentication for incoming requests.
#[derive(Clone)]
pub struct AuthInterceptor {
    verifier: Arc<dyn IdentityVerifier>,
    excluded: Arc<HashSet<String>>,
}

impl AuthInterceptor {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        excluded_paths: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            verifier,
            excluded: Arc::new(excluded_paths.into_iter().collect()),
        }
    }

    /// Whether `path` skips authentication. Exact match only.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded.contains(path)
    }

    /// Decide how a request with this path and these headers is authenticated.
    pub async fn decide(&self, path: &str, headers: &HeaderMap) -> AuthDecision {
        if self.is_excluded(path) {
            return AuthDecision {
                required: false,
                outcome: AuthOutcome::Bypassed,
            };
        }

        let token = headers
            .get(header::AUTHORIZATION)
            .map(|v| v.to_str().map_err(|_| VerifyError::MalformedToken));

        let outcome = match token {
            None | Some(Ok("")) => AuthOutcome::Rejected(RejectReason::MissingToken),
            Some(Err(e)) => AuthOutcome::Rejected(RejectReason::Verification(e)),
            Some(Ok(token)) => match self.verifier.verify(token).await {
                Ok(identity) => AuthOutcome::Authenticated(identity),
                Err(e) => AuthOutcome::Rejected(RejectReason::Verification(e)),
            },
        };

        AuthDecision {
            required: true,
            outcome,
        }
    }
}

/// Axum middleware wrapping the dispatcher.
pub async fn auth_middleware(
    State(interceptor): State<AuthInterceptor>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let decision = interceptor
        .decide(request.uri().path(), request.headers())
        .await;

    let reason = match decision.outcome {
        AuthOutcome::Bypassed => {
            metrics::record_auth("bypassed");
            return next.run(request).await;
        }
        AuthOutcome::Authenticated(identity) => match identity.inject(request.headers_mut()) {
            Ok(()) => {
                tracing::debug!(
                    user_id = identity.user_id,
                    person_id = identity.person_id,
                    role = %identity.role,
                    "Request authenticated"
                );
                metrics::record_auth("authenticated");
                return next.run(request).await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Identity service returned an unusable identity");
                RejectReason::UnencodableIdentity
            }
        },
        AuthOutcome::Rejected(reason) => reason,
    };

    let path = request.uri().path();
    match &reason {
        RejectReason::Verification(
            e @ (VerifyError::Unreachable(_)
            | VerifyError::Timeout(_)
            | VerifyError::DeadlineExceeded(_)
            | VerifyError::Rpc(_)),
        ) => tracing::warn!(path = %path, error = %e, "Identity check failed"),
        _ => tracing::debug!(path = %path, reason = reason.label(), "Request rejected"),
    }
    metrics::record_auth(reason.label());
    response::unauthorized()
}
