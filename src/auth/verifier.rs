//! Identity verification against the identity service.
//!
//! # Responsibilities
//! - Exchange a bearer token for an [`Identity`]
//! - Bound every check with a timeout
//! - Tell apart "service unreachable" from "token invalid" for logs
//!
//! # Design Decisions
//! - One contract: the call returns `valid` plus identity, or fails
//! - The token travels as `authorization` metadata, untouched
//! - Callers see a single rejection; the detail is internal only

use std::time::Duration;

use async_trait::async_trait;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::Channel;
use tonic::{Code, Status};

use crate::auth::identity::Identity;
use crate::rpc::client::AuthServiceClient;
use crate::rpc::proto::auth::EmptyMessage;

/// Why a token was not accepted.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("token cannot be sent as RPC metadata")]
    MalformedToken,
    #[error("token rejected by identity service")]
    InvalidToken,
    #[error("identity service unreachable: {0}")]
    Unreachable(Status),
    #[error("identity check timed out after {0:?}")]
    Timeout(Duration),
    #[error("identity service deadline exceeded: {0}")]
    DeadlineExceeded(Status),
    #[error("identity service error: {0}")]
    Rpc(Status),
}

impl VerifyError {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            VerifyError::MalformedToken => "malformed_token",
            VerifyError::InvalidToken => "invalid_token",
            VerifyError::Unreachable(_) => "verifier_unreachable",
            VerifyError::Timeout(_) | VerifyError::DeadlineExceeded(_) => "verifier_timeout",
            VerifyError::Rpc(_) => "verifier_error",
        }
    }
}

impl From<Status> for VerifyError {
    fn from(status: Status) -> Self {
        match status.code() {
            Code::Unauthenticated | Code::PermissionDenied => VerifyError::InvalidToken,
            Code::Unavailable => VerifyError::Unreachable(status),
            Code::DeadlineExceeded => VerifyError::DeadlineExceeded(status),
            _ => VerifyError::Rpc(status),
        }
    }
}

/// Exchanges a raw `Authorization` value for a verified identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError>;
}

/// Verifier backed by `auth.AuthService/GetToken`.
#[derive(Debug, Clone)]
pub struct GrpcIdentityVerifier {
    client: AuthServiceClient,
    timeout: Duration,
}

impl GrpcIdentityVerifier {
    pub fn new(channel: Channel, timeout: Duration) -> Self {
        Self {
            client: AuthServiceClient::new(channel),
            timeout,
        }
    }
}

#[async_trait]
impl IdentityVerifier for GrpcIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        let value: MetadataValue<Ascii> =
            MetadataValue::try_from(token).map_err(|_| VerifyError::MalformedToken)?;
        let mut request = tonic::Request::new(EmptyMessage {});
        request.metadata_mut().insert("authorization", value);
        request.set_timeout(self.timeout);

        let mut client = self.client.clone();
        let response = tokio::time::timeout(self.timeout, client.get_token(request))
            .await
            .map_err(|_| VerifyError::Timeout(self.timeout))?
            .map_err(|status| match status.code() {
                // The deadline carried by the call is our own timeout.
                Code::DeadlineExceeded => VerifyError::Timeout(self.timeout),
                _ => VerifyError::from(status),
            })?;

        let token = response.into_inner();
        if !token.valid {
            return Err(VerifyError::InvalidToken);
        }

        Ok(Identity {
            role: token.role,
            user_id: token.user_id,
            person_id: token.person_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::task::{Context, Poll};

    use axum::http;
    use futures_util::future::BoxFuture;
    use tonic::body::BoxBody;
    use tonic::codec::ProstCodec;
    use tonic::server::{Grpc, NamedService, UnaryService};
    use tonic::transport::{server::TcpIncoming, Endpoint, Server};

    use crate::rpc::proto::auth::TokenResponse;

    /// In-process `auth.AuthService` that answers `GetToken` with a fixed
    /// reply and records the `authorization` metadata it received.
    #[derive(Clone)]
    struct FakeAuthService {
        reply: TokenResponse,
        delay: Duration,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl FakeAuthService {
        fn new(reply: TokenResponse) -> Self {
            Self {
                reply,
                delay: Duration::ZERO,
                seen: Arc::default(),
            }
        }
    }

    impl NamedService for FakeAuthService {
        const NAME: &'static str = "auth.AuthService";
    }

    struct GetToken(FakeAuthService);

    impl UnaryService<EmptyMessage> for GetToken {
        type Response = TokenResponse;
        type Future = BoxFuture<'static, Result<tonic::Response<TokenResponse>, Status>>;

        fn call(&mut self, request: tonic::Request<EmptyMessage>) -> Self::Future {
            let service = self.0.clone();
            Box::pin(async move {
                if let Some(value) = request.metadata().get("authorization") {
                    let value = value.to_str().unwrap_or_default().to_string();
                    service.seen.lock().unwrap().push(value);
                }
                tokio::time::sleep(service.delay).await;
                Ok(tonic::Response::new(service.reply))
            })
        }
    }

    impl tower::Service<http::Request<BoxBody>> for FakeAuthService {
        type Response = http::Response<BoxBody>;
        type Error = Infallible;
        type Future = BoxFuture<'static, Result<Self::Response, Infallible>>;

        fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Infallible>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, request: http::Request<BoxBody>) -> Self::Future {
            let method = GetToken(self.clone());
            Box::pin(async move {
                let codec: ProstCodec<TokenResponse, EmptyMessage> = ProstCodec::default();
                let mut grpc = Grpc::new(codec);
                Ok(grpc.unary(method, request).await)
            })
        }
    }

    async fn serve(service: FakeAuthService) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let incoming = TcpIncoming::from_listener(listener, true, None).unwrap();
        tokio::spawn(
            Server::builder()
                .add_service(service)
                .serve_with_incoming(incoming),
        );
        addr
    }

    fn verifier_for(addr: SocketAddr, timeout: Duration) -> GrpcIdentityVerifier {
        let channel = Endpoint::from_shared(format!("http://{addr}"))
            .unwrap()
            .connect_lazy();
        GrpcIdentityVerifier::new(channel, timeout)
    }

    fn token(valid: bool) -> TokenResponse {
        TokenResponse {
            role: "tourist".to_string(),
            user_id: 42,
            person_id: 7,
            valid,
        }
    }

    #[tokio::test]
    async fn test_valid_token_yields_identity() {
        let service = FakeAuthService::new(token(true));
        let seen = service.seen.clone();
        let addr = serve(service).await;

        let identity = verifier_for(addr, Duration::from_secs(2))
            .verify("Bearer xyz")
            .await
            .unwrap();

        assert_eq!(
            identity,
            Identity {
                role: "tourist".to_string(),
                user_id: 42,
                person_id: 7,
            }
        );
        assert_eq!(*seen.lock().unwrap(), vec!["Bearer xyz".to_string()]);
    }

    #[tokio::test]
    async fn test_token_flagged_invalid_is_rejected() {
        let addr = serve(FakeAuthService::new(token(false))).await;

        let err = verifier_for(addr, Duration::from_secs(2))
            .verify("Bearer xyz")
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::InvalidToken));
    }

    #[tokio::test]
    async fn test_slow_service_times_out_with_configured_bound() {
        let mut service = FakeAuthService::new(token(true));
        service.delay = Duration::from_secs(5);
        let addr = serve(service).await;

        let timeout = Duration::from_millis(200);
        let err = verifier_for(addr, timeout).verify("Bearer xyz").await.unwrap_err();
        assert!(matches!(err, VerifyError::Timeout(bound) if bound == timeout));
        assert_eq!(err.label(), "verifier_timeout");
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            VerifyError::from(Status::unauthenticated("expired")),
            VerifyError::InvalidToken
        ));
        assert!(matches!(
            VerifyError::from(Status::unavailable("connection refused")),
            VerifyError::Unreachable(_)
        ));
        let deadline = VerifyError::from(Status::deadline_exceeded("slow"));
        assert!(matches!(deadline, VerifyError::DeadlineExceeded(_)));
        assert_eq!(deadline.label(), "verifier_timeout");
        assert!(!deadline.to_string().contains("0ns"));
        assert!(matches!(
            VerifyError::from(Status::internal("boom")),
            VerifyError::Rpc(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        // Reserve a port, then free it so every call is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let channel = tonic::transport::Endpoint::from_shared(format!("http://{addr}"))
            .unwrap()
            .connect_lazy();
        let verifier = GrpcIdentityVerifier::new(channel, Duration::from_secs(2));

        let err = verifier.verify("Bearer xyz").await.unwrap_err();
        assert!(matches!(
            err,
            VerifyError::Unreachable(_) | VerifyError::Rpc(_) | VerifyError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn test_non_ascii_token_is_malformed() {
        let channel = tonic::transport::Endpoint::from_static("http://127.0.0.1:1").connect_lazy();
        let verifier = GrpcIdentityVerifier::new(channel, Duration::from_secs(1));

        let err = verifier.verify("Bearer\u{7f}").await.unwrap_err();
        assert!(matches!(err, VerifyError::MalformedToken));
    }
}
