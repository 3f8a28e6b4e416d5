//! Verified caller identity and its header encoding.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub const X_USER_ROLE: HeaderName = HeaderName::from_static("x-user-role");
pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");
pub const X_PERSON_ID: HeaderName = HeaderName::from_static("x-person-id");

/// Same values, in the namespace the transcoder turns into RPC metadata.
pub const GRPC_METADATA_X_USER_ROLE: HeaderName =
    HeaderName::from_static("grpc-metadata-x-user-role");
pub const GRPC_METADATA_X_USER_ID: HeaderName = HeaderName::from_static("grpc-metadata-x-user-id");
pub const GRPC_METADATA_X_PERSON_ID: HeaderName =
    HeaderName::from_static("grpc-metadata-x-person-id");

/// Every header written by [`Identity::inject`].
pub const IDENTITY_HEADERS: [HeaderName; 6] = [
    X_USER_ROLE,
    X_USER_ID,
    X_PERSON_ID,
    GRPC_METADATA_X_USER_ROLE,
    GRPC_METADATA_X_USER_ID,
    GRPC_METADATA_X_PERSON_ID,
];

/// The identity behind an accepted token. Lives for one request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: String,
    pub user_id: i64,
    pub person_id: i64,
}

/// The role string cannot be sent as an HTTP header value.
#[derive(Debug, thiserror::Error)]
#[error("role `{0}` is not a valid header value")]
pub struct InvalidRole(pub String);

impl Identity {
    /// Write both header conventions, replacing any values the client sent.
    pub fn inject(&self, headers: &mut HeaderMap) -> Result<(), InvalidRole> {
        let role =
            HeaderValue::from_str(&self.role).map_err(|_| InvalidRole(self.role.clone()))?;
        let user_id = HeaderValue::from(self.user_id);
        let person_id = HeaderValue::from(self.person_id);

        headers.insert(X_USER_ROLE, role.clone());
        headers.insert(X_USER_ID, user_id.clone());
        headers.insert(X_PERSON_ID, person_id.clone());

        headers.insert(GRPC_METADATA_X_USER_ROLE, role);
        headers.insert(GRPC_METADATA_X_USER_ID, user_id);
        headers.insert(GRPC_METADATA_X_PERSON_ID, person_id);
        Ok(())
    }
}
