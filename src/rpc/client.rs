//! Unary clients for the RPC backends.
//!
//! Mirrors the client half of `tonic-build` output: a `tonic::client::Grpc`
//! over a shared `Channel`, one method per RPC, prost codec.

use axum::http::uri::PathAndQuery;
use tonic::client::Grpc;
use tonic::codec::ProstCodec;
use tonic::transport::Channel;
use tonic::{IntoRequest, Response, Status};

use crate::rpc::proto::{auth, stakeholders, tours};

async fn unary<Req, Resp>(
    grpc: &mut Grpc<Channel>,
    path: &'static str,
    request: tonic::Request<Req>,
) -> Result<Response<Resp>, Status>
where
    Req: prost::Message + Send + Sync + 'static,
    Resp: prost::Message + Default + Send + Sync + 'static,
{
    grpc.ready()
        .await
        .map_err(|e| Status::unknown(format!("Service was not ready: {e}")))?;
    let codec: ProstCodec<Req, Resp> = ProstCodec::default();
    grpc.unary(request, PathAndQuery::from_static(path), codec)
        .await
}

/// Client for `auth.AuthService`.
#[derive(Debug, Clone)]
pub struct AuthServiceClient {
    inner: Grpc<Channel>,
}

impl AuthServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    /// Exchange the `authorization` metadata of the call for the caller's identity.
    pub async fn get_token(
        &mut self,
        request: impl IntoRequest<auth::EmptyMessage>,
    ) -> Result<Response<auth::TokenResponse>, Status> {
        unary(&mut self.inner, "/auth.AuthService/GetToken", request.into_request()).await
    }

    pub async fn login(
        &mut self,
        request: impl IntoRequest<auth::LoginRequest>,
    ) -> Result<Response<auth::AuthenticationResponse>, Status> {
        unary(&mut self.inner, "/auth.AuthService/Login", request.into_request()).await
    }

    pub async fn register(
        &mut self,
        request: impl IntoRequest<auth::RegisterRequest>,
    ) -> Result<Response<auth::AuthenticationResponse>, Status> {
        unary(&mut self.inner, "/auth.AuthService/Register", request.into_request()).await
    }

    pub async fn validate(
        &mut self,
        request: impl IntoRequest<auth::ValidateRequest>,
    ) -> Result<Response<auth::TokenResponse>, Status> {
        unary(&mut self.inner, "/auth.AuthService/Validate", request.into_request()).await
    }
}

/// Client for `tours.TourExecutionService`.
#[derive(Debug, Clone)]
pub struct TourExecutionServiceClient {
    inner: Grpc<Channel>,
}

impl TourExecutionServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    pub async fn abandon(
        &mut self,
        request: impl IntoRequest<tours::TourExecutionActionRequest>,
    ) -> Result<Response<tours::TourExecutionResponse>, Status> {
        unary(
            &mut self.inner,
            "/tours.TourExecutionService/Abandon",
            request.into_request(),
        )
        .await
    }

    pub async fn complete(
        &mut self,
        request: impl IntoRequest<tours::TourExecutionActionRequest>,
    ) -> Result<Response<tours::TourExecutionResponse>, Status> {
        unary(
            &mut self.inner,
            "/tours.TourExecutionService/Complete",
            request.into_request(),
        )
        .await
    }
}

/// Client for `stakeholders.UserService`.
#[derive(Debug, Clone)]
pub struct UserServiceClient {
    inner: Grpc<Channel>,
}

impl UserServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    pub async fn get_user(
        &mut self,
        request: impl IntoRequest<stakeholders::UserIdRequest>,
    ) -> Result<Response<stakeholders::UserResponse>, Status> {
        unary(&mut self.inner, "/stakeholders.UserService/GetUser", request.into_request()).await
    }

    pub async fn block_user(
        &mut self,
        request: impl IntoRequest<stakeholders::UserIdRequest>,
    ) -> Result<Response<stakeholders::UserResponse>, Status> {
        unary(&mut self.inner, "/stakeholders.UserService/BlockUser", request.into_request()).await
    }
}

/// Client for `stakeholders.PersonService`.
#[derive(Debug, Clone)]
pub struct PersonServiceClient {
    inner: Grpc<Channel>,
}

impl PersonServiceClient {
    pub fn new(channel: Channel) -> Self {
        Self {
            inner: Grpc::new(channel),
        }
    }

    pub async fn get_person(
        &mut self,
        request: impl IntoRequest<stakeholders::PersonRequest>,
    ) -> Result<Response<stakeholders::Person>, Status> {
        unary(
            &mut self.inner,
            "/stakeholders.PersonService/GetPerson",
            request.into_request(),
        )
        .await
    }

    pub async fn update_person(
        &mut self,
        request: impl IntoRequest<stakeholders::Person>,
    ) -> Result<Response<stakeholders::Person>, Status> {
        unary(
            &mut self.inner,
            "/stakeholders.PersonService/UpdatePerson",
            request.into_request(),
        )
        .await
    }
}
