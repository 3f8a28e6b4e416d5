//! HTTP backend abstraction.
//!
//! # Responsibilities
//! - Represent one reverse-proxy origin
//! - Rewrite inbound request URIs onto that origin
//!
//! # Design Decisions
//! - Stateless: connection reuse is left to the shared HTTP client
//! - Only scheme, host and port are taken from the origin; an origin base
//!   path is joined in front of the request path

use std::fmt;
use std::str::FromStr;

use axum::http::uri::{Authority, InvalidUri, PathAndQuery, Scheme};
use axum::http::Uri;
use url::Url;

/// Error building an HTTP backend or rewriting a URI onto it.
#[derive(Debug, thiserror::Error)]
pub enum HttpBackendError {
    #[error("invalid origin URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("origin `{0}` must use the http scheme")]
    Scheme(String),
    #[error("origin `{0}` has no host")]
    MissingHost(String),
    #[error("invalid URI: {0}")]
    Uri(#[from] InvalidUri),
    #[error("invalid URI: {0}")]
    Http(#[from] axum::http::Error),
}

/// A single reverse-proxy target.
#[derive(Clone)]
pub struct HttpBackend {
    name: String,
    /// The configured origin, kept for logging.
    origin: Url,
    authority: Authority,
    base_path: String,
    base_query: Option<String>,
}

impl HttpBackend {
    /// Create a backend from an origin URL such as "http://localhost:8080".
    pub fn new(name: impl Into<String>, address: &str) -> Result<Self, HttpBackendError> {
        let origin = Url::parse(address)?;
        if origin.scheme() != "http" {
            return Err(HttpBackendError::Scheme(address.to_string()));
        }
        let host = origin
            .host_str()
            .ok_or_else(|| HttpBackendError::MissingHost(address.to_string()))?;
        let authority = match origin.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };

        Ok(Self {
            name: name.into(),
            authority: Authority::from_str(&authority)?,
            base_path: origin.path().to_string(),
            base_query: origin.query().map(str::to_string),
            origin,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Rewrite an inbound URI so it targets this backend.
    ///
    /// Path and query of the inbound request are kept; the origin's base path
    /// is joined in front with a single slash and its query, if any, is
    /// prepended with `&`.
    pub fn upstream_uri(&self, inbound: &Uri) -> Result<Uri, HttpBackendError> {
        let path = join_paths(&self.base_path, inbound.path());
        let query = match (self.base_query.as_deref(), inbound.query()) {
            (Some(base), Some(q)) if !base.is_empty() && !q.is_empty() => {
                Some(format!("{base}&{q}"))
            }
            (Some(base), Some(q)) => Some(format!("{base}{q}")),
            (Some(base), None) => Some(base.to_string()),
            (None, Some(q)) => Some(q.to_string()),
            (None, None) => None,
        };
        let path_and_query = match query {
            Some(q) => PathAndQuery::from_str(&format!("{path}?{q}"))?,
            None => PathAndQuery::from_str(&path)?,
        };

        Ok(Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()?)
    }
}

impl fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpBackend")
            .field("name", &self.name)
            .field("origin", &self.origin.as_str())
            .finish()
    }
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{base}/{path}"),
        _ => format!("{base}{path}"),
    }
}
