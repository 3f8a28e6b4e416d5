//! Response helpers.
//!
//! # Responsibilities
//! - Fixed plain-text responses produced by the gateway itself
//! - Hop-by-hop header stripping shared by request and response paths
//!
//! # Design Decisions
//! - Gateway-generated errors carry no detail beyond a fixed message
//! - Backend responses are never rewritten beyond hop-by-hop headers

use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Headers that describe one connection and must not be forwarded.
const HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn plain_text(status: StatusCode, body: &'static str) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
            (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        ],
        Body::from(body),
    )
        .into_response()
}

/// The single response for every authentication failure.
pub fn unauthorized() -> Response {
    plain_text(StatusCode::UNAUTHORIZED, "unauthorized\n")
}

/// No route matched.
pub fn not_found() -> Response {
    plain_text(StatusCode::NOT_FOUND, "404 page not found\n")
}

/// The upstream could not be reached or the request could not be built.
pub fn bad_gateway() -> Response {
    StatusCode::BAD_GATEWAY.into_response()
}

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}
