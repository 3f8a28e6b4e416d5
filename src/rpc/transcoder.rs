//! JSON to RPC transcoding engine.
//!
//! # Responsibilities
//! - Hold unary RPC bindings keyed by HTTP method and exact path
//! - Decode the JSON body into the request message, forward metadata
//! - Encode the response message (or RPC status) back to JSON
//!
//! # Design Decisions
//! - Bindings are registered at startup and immutable afterwards
//! - Each binding is a type-erased closure; the typed client call is captured
//!   at registration, so the engine itself knows nothing about protobuf
//! - Errors use the `{code, message, details}` JSON envelope with the usual
//!   RPC-code to HTTP-status mapping

use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use bytes::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tonic::metadata::{Ascii, KeyAndValueRef, MetadataKey, MetadataMap, MetadataValue};
use tonic::{Code, Status};

/// Header prefix used to carry RPC metadata over HTTP.
pub const METADATA_HEADER_PREFIX: &str = "grpc-metadata-";

type UnaryResult = Result<(MetadataMap, Bytes), Status>;
type UnaryCall = Arc<dyn Fn(MetadataMap, Bytes) -> BoxFuture<'static, UnaryResult> + Send + Sync>;

/// Error registering a binding.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("binding path `{0}` must start with '/'")]
    InvalidPath(String),
    #[error("{method} {path} is already bound to {existing}")]
    Duplicate {
        method: Method,
        path: String,
        existing: &'static str,
    },
}

struct Binding {
    method: Method,
    path: String,
    rpc: &'static str,
    call: UnaryCall,
}

/// Registry of unary bindings plus the HTTP entry point serving them.
pub struct Transcoder {
    bindings: Vec<Binding>,
    max_body_bytes: usize,
}

impl Transcoder {
    pub fn new(max_body_bytes: usize) -> Self {
        Self {
            bindings: Vec::new(),
            max_body_bytes,
        }
    }

    /// Bind `method path` to a unary RPC.
    ///
    /// `rpc` is the fully qualified method name, used in logs.
    /// `handler` receives the decoded request with its metadata attached.
    pub fn register_unary<Req, Resp, F, Fut>(
        &mut self,
        method: Method,
        path: &str,
        rpc: &'static str,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        Req: DeserializeOwned + Default + Send + 'static,
        Resp: Serialize + Send + 'static,
        F: Fn(tonic::Request<Req>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<tonic::Response<Resp>, Status>> + Send + 'static,
    {
        if !path.starts_with('/') {
            return Err(RegistrationError::InvalidPath(path.to_string()));
        }
        if let Some(existing) = self.find(&method, path) {
            return Err(RegistrationError::Duplicate {
                method,
                path: path.to_string(),
                existing: existing.rpc,
            });
        }

        let call: UnaryCall = Arc::new(move |metadata: MetadataMap, body: Bytes| -> BoxFuture<'static, UnaryResult> {
            let message = match decode_body::<Req>(&body) {
                Ok(message) => message,
                Err(status) => return futures_util::future::ready(Err(status)).boxed(),
            };
            let request = tonic::Request::from_parts(metadata, Default::default(), message);
            let fut = handler(request);
            async move {
                let (metadata, message, _) = fut.await?.into_parts();
                let json = serde_json::to_vec(&message)
                    .map_err(|e| Status::internal(format!("failed to encode response: {e}")))?;
                Ok((metadata, Bytes::from(json)))
            }
            .boxed()
        });

        tracing::debug!(%method, path, rpc, "Registered transcoding binding");
        self.bindings.push(Binding {
            method,
            path: path.to_string(),
            rpc,
            call,
        });
        Ok(())
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn find(&self, method: &Method, path: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| b.method == method && b.path == path)
    }

    /// Serve one HTTP request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let path = request.uri().path();
        let Some(binding) = self.find(request.method(), path) else {
            return if self.bindings.iter().any(|b| b.path == path) {
                error_response(StatusCode::METHOD_NOT_ALLOWED, Code::Unimplemented, "Method Not Allowed")
            } else {
                error_response(StatusCode::NOT_FOUND, Code::NotFound, "Not Found")
            };
        };

        let metadata = metadata_from_headers(request.headers());
        let body = match axum::body::to_bytes(request.into_body(), self.max_body_bytes).await {
            Ok(body) => body,
            Err(e) => {
                let status = Status::invalid_argument(format!("failed to read request body: {e}"));
                return status_response(&status);
            }
        };

        match (binding.call)(metadata, body).await {
            Ok((metadata, json)) => {
                let mut response = (
                    [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
                    json,
                )
                    .into_response();
                headers_from_metadata(&metadata, response.headers_mut());
                response
            }
            Err(status) => {
                tracing::debug!(
                    rpc = binding.rpc,
                    code = ?status.code(),
                    message = status.message(),
                    "RPC returned error status"
                );
                status_response(&status)
            }
        }
    }
}

fn decode_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, Status> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| Status::invalid_argument(e.to_string()))
}

/// Build outgoing metadata from request headers.
///
/// `Authorization` becomes `authorization`; `Grpc-Metadata-<name>` becomes
/// `<name>`. Everything else stays behind.
pub fn metadata_from_headers(headers: &HeaderMap) -> MetadataMap {
    let mut metadata = MetadataMap::new();

    for (name, value) in headers {
        let key = if name == header::AUTHORIZATION {
            name.as_str()
        } else if let Some(stripped) = name.as_str().strip_prefix(METADATA_HEADER_PREFIX) {
            stripped
        } else {
            continue;
        };

        let Ok(value) = value.to_str() else { continue };
        match (
            MetadataKey::<Ascii>::from_bytes(key.as_bytes()),
            MetadataValue::<Ascii>::try_from(value),
        ) {
            (Ok(key), Ok(value)) => {
                metadata.append(key, value);
            }
            _ => tracing::debug!(header = %name, "Dropping header not representable as metadata"),
        }
    }

    metadata
}

/// Copy ASCII response metadata onto `Grpc-Metadata-<name>` headers.
fn headers_from_metadata(metadata: &MetadataMap, headers: &mut HeaderMap) {
    for entry in metadata.iter() {
        let KeyAndValueRef::Ascii(key, value) = entry else { continue };
        let name = format!("{METADATA_HEADER_PREFIX}{}", key.as_str());
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_bytes(value.as_encoded_bytes()),
        ) {
            headers.append(name, value);
        }
    }
}

/// Map an RPC status code onto the HTTP status served to the client.
pub fn http_status(code: Code) -> StatusCode {
    match code {
        Code::Ok => StatusCode::OK,
        Code::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
        Code::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        Code::InvalidArgument => StatusCode::BAD_REQUEST,
        Code::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
        Code::NotFound => StatusCode::NOT_FOUND,
        Code::AlreadyExists => StatusCode::CONFLICT,
        Code::PermissionDenied => StatusCode::FORBIDDEN,
        Code::Unauthenticated => StatusCode::UNAUTHORIZED,
        Code::ResourceExhausted => StatusCode::TOO_MANY_REQUESTS,
        Code::FailedPrecondition => StatusCode::BAD_REQUEST,
        Code::Aborted => StatusCode::CONFLICT,
        Code::OutOfRange => StatusCode::BAD_REQUEST,
        Code::Unimplemented => StatusCode::NOT_IMPLEMENTED,
        Code::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        Code::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        Code::DataLoss => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn status_response(status: &Status) -> Response {
    error_response(http_status(status.code()), status.code(), status.message())
}

fn error_response(http: StatusCode, code: Code, message: &str) -> Response {
    let body = serde_json::json!({
        "code": code as i32,
        "message": message,
        "details": [],
    });
    (http, axum::Json(body)).into_response()
}
