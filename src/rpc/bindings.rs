//! HTTP bindings of the RPC services served through the transcoder.

use axum::http::Method;
use tonic::transport::Channel;

use crate::rpc::client::{
    AuthServiceClient, PersonServiceClient, TourExecutionServiceClient, UserServiceClient,
};
use crate::rpc::proto::{auth, stakeholders, tours};
use crate::rpc::transcoder::{RegistrationError, Transcoder};

/// Register `auth.AuthService`.
pub fn register_auth_service(
    transcoder: &mut Transcoder,
    channel: Channel,
) -> Result<(), RegistrationError> {
    let client = AuthServiceClient::new(channel);

    let c = client.clone();
    transcoder.register_unary(
        Method::POST,
        "/api/auth",
        "auth.AuthService/Register",
        move |req: tonic::Request<auth::RegisterRequest>| {
            let mut c = c.clone();
            async move { c.register(req).await }
        },
    )?;

    let c = client.clone();
    transcoder.register_unary(
        Method::POST,
        "/api/auth/login",
        "auth.AuthService/Login",
        move |req: tonic::Request<auth::LoginRequest>| {
            let mut c = c.clone();
            async move { c.login(req).await }
        },
    )?;

    let c = client.clone();
    transcoder.register_unary(
        Method::POST,
        "/api/auth/validate",
        "auth.AuthService/Validate",
        move |req: tonic::Request<auth::ValidateRequest>| {
            let mut c = c.clone();
            async move { c.validate(req).await }
        },
    )?;

    transcoder.register_unary(
        Method::GET,
        "/api/auth/token",
        "auth.AuthService/GetToken",
        move |req: tonic::Request<auth::EmptyMessage>| {
            let mut c = client.clone();
            async move { c.get_token(req).await }
        },
    )?;

    Ok(())
}

/// Register `tours.TourExecutionService`.
pub fn register_tour_execution_service(
    transcoder: &mut Transcoder,
    channel: Channel,
) -> Result<(), RegistrationError> {
    let client = TourExecutionServiceClient::new(channel);

    let c = client.clone();
    transcoder.register_unary(
        Method::POST,
        "/api/tours/tour-executions/abandon",
        "tours.TourExecutionService/Abandon",
        move |req: tonic::Request<tours::TourExecutionActionRequest>| {
            let mut c = c.clone();
            async move { c.abandon(req).await }
        },
    )?;

    transcoder.register_unary(
        Method::POST,
        "/api/tours/tour-executions/complete",
        "tours.TourExecutionService/Complete",
        move |req: tonic::Request<tours::TourExecutionActionRequest>| {
            let mut c = client.clone();
            async move { c.complete(req).await }
        },
    )?;

    Ok(())
}

/// Register `stakeholders.UserService`.
///
/// The paths sit under the `/api/auth` transcoding prefix, next to the
/// `AuthService` bindings that share the identity channel.
pub fn register_user_service(
    transcoder: &mut Transcoder,
    channel: Channel,
) -> Result<(), RegistrationError> {
    let client = UserServiceClient::new(channel);

    let c = client.clone();
    transcoder.register_unary(
        Method::POST,
        "/api/auth/users/get",
        "stakeholders.UserService/GetUser",
        move |req: tonic::Request<stakeholders::UserIdRequest>| {
            let mut c = c.clone();
            async move { c.get_user(req).await }
        },
    )?;

    transcoder.register_unary(
        Method::POST,
        "/api/auth/users/block",
        "stakeholders.UserService/BlockUser",
        move |req: tonic::Request<stakeholders::UserIdRequest>| {
            let mut c = client.clone();
            async move { c.block_user(req).await }
        },
    )?;

    Ok(())
}

/// Register `stakeholders.PersonService`.
pub fn register_person_service(
    transcoder: &mut Transcoder,
    channel: Channel,
) -> Result<(), RegistrationError> {
    let client = PersonServiceClient::new(channel);

    let c = client.clone();
    transcoder.register_unary(
        Method::POST,
        "/api/auth/persons/get",
        "stakeholders.PersonService/GetPerson",
        move |req: tonic::Request<stakeholders::PersonRequest>| {
            let mut c = c.clone();
            async move { c.get_person(req).await }
        },
    )?;

    transcoder.register_unary(
        Method::PUT,
        "/api/auth/persons/update",
        "stakeholders.PersonService/UpdatePerson",
        move |req: tonic::Request<stakeholders::Person>| {
            let mut c = client.clone();
            async move { c.update_person(req).await }
        },
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_services_register_without_conflicts() {
        // A lazy channel never dials, so registration needs no server.
        let channel = tonic::transport::Endpoint::from_static("http://127.0.0.1:1").connect_lazy();
        let mut transcoder = Transcoder::new(1024);

        register_auth_service(&mut transcoder, channel.clone()).unwrap();
        register_user_service(&mut transcoder, channel.clone()).unwrap();
        register_person_service(&mut transcoder, channel.clone()).unwrap();
        register_tour_execution_service(&mut transcoder, channel.clone()).unwrap();
        assert_eq!(transcoder.len(), 10);

        let err = register_auth_service(&mut transcoder, channel.clone()).unwrap_err();
        assert!(matches!(err, RegistrationError::Duplicate { .. }));
        let err = register_person_service(&mut transcoder, channel).unwrap_err();
        assert!(matches!(err, RegistrationError::Duplicate { .. }));
    }
}
