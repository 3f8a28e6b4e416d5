//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled route rules in two priority tiers
//! - Classify a request path into exactly one handling decision
//! - Return an explicit no-match rather than a silent default
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Transcoding rules are always evaluated before reverse-proxy rules, so a
//!   path both tiers could match resolves to transcoding
//! - Within a tier, first registered wins
//! - O(n) linear scan (the table is a dozen entries)

use std::fmt;
use std::sync::Arc;

use crate::backend::{BackendRegistry, HttpBackend};
use crate::config::{HandlerKind, MatchKind, RouteConfig};
use crate::routing::matcher::{self, Matcher};

/// Where a matched request goes.
#[derive(Debug, Clone)]
pub enum RouteTarget {
    Transcoding,
    ReverseProxy(Arc<HttpBackend>),
}

impl RouteTarget {
    pub fn handler_kind(&self) -> HandlerKind {
        match self {
            RouteTarget::Transcoding => HandlerKind::Transcoding,
            RouteTarget::ReverseProxy(_) => HandlerKind::ReverseProxy,
        }
    }
}

/// One entry of the routing table.
#[derive(Debug)]
pub struct RouteRule {
    matcher: Box<dyn Matcher>,
    target: RouteTarget,
}

impl RouteRule {
    pub fn new(match_kind: MatchKind, pattern: impl Into<String>, target: RouteTarget) -> Self {
        Self {
            matcher: matcher::compile(match_kind, pattern),
            target,
        }
    }

    /// A prefix rule served by the transcoding engine.
    pub fn transcoding(prefix: impl Into<String>) -> Self {
        Self::new(MatchKind::Prefix, prefix, RouteTarget::Transcoding)
    }

    /// A rule reverse-proxied to `backend`.
    pub fn proxy(match_kind: MatchKind, pattern: impl Into<String>, backend: Arc<HttpBackend>) -> Self {
        Self::new(match_kind, pattern, RouteTarget::ReverseProxy(backend))
    }

    pub fn pattern(&self) -> &str {
        self.matcher.pattern()
    }

    pub fn target(&self) -> &RouteTarget {
        &self.target
    }

    fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }
}

/// The outcome of classifying a path.
#[derive(Clone, Copy)]
pub enum Route<'a> {
    /// Serve through the transcoding engine.
    Transcode,
    /// Reverse-proxy to this backend.
    Proxy(&'a Arc<HttpBackend>),
    /// No rule matched.
    NotFound,
}

impl Route<'_> {
    /// Short label for logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Transcode => "transcoding",
            Route::Proxy(_) => "reverse_proxy",
            Route::NotFound => "not_found",
        }
    }
}

impl fmt::Debug for Route<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Transcode => f.write_str("Transcode"),
            Route::Proxy(backend) => f.debug_tuple("Proxy").field(&backend.name()).finish(),
            Route::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Error building the routing table from configuration.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("route `{path}` references unknown HTTP backend `{backend}`")]
    UnknownBackend { path: String, backend: String },
    #[error("reverse-proxy route `{0}` has no backend")]
    MissingBackend(String),
}

/// Immutable, priority-ordered routing table.
#[derive(Debug, Default)]
pub struct RouteClassifier {
    transcoding: Vec<RouteRule>,
    proxy: Vec<RouteRule>,
}

impl RouteClassifier {
    /// Build a classifier from rules in registration order.
    pub fn new(rules: impl IntoIterator<Item = RouteRule>) -> Self {
        let (transcoding, proxy) = rules
            .into_iter()
            .partition(|rule| matches!(rule.target, RouteTarget::Transcoding));
        Self { transcoding, proxy }
    }

    /// Compile configured routes against the registered HTTP backends.
    pub fn from_config(
        routes: &[RouteConfig],
        backends: &BackendRegistry,
    ) -> Result<Self, RouteError> {
        let mut rules = Vec::with_capacity(routes.len());
        for route in routes {
            let target = match route.handler {
                HandlerKind::Transcoding => RouteTarget::Transcoding,
                HandlerKind::ReverseProxy => {
                    let name = route
                        .backend
                        .as_deref()
                        .ok_or_else(|| RouteError::MissingBackend(route.path.clone()))?;
                    let backend = backends.http(name).ok_or_else(|| RouteError::UnknownBackend {
                        path: route.path.clone(),
                        backend: name.to_string(),
                    })?;
                    RouteTarget::ReverseProxy(backend)
                }
            };
            rules.push(RouteRule::new(route.match_kind, route.path.clone(), target));
        }
        Ok(Self::new(rules))
    }

    /// Classify a request path.
    pub fn classify(&self, path: &str) -> Route<'_> {
        if self.transcoding.iter().any(|rule| rule.matches(path)) {
            return Route::Transcode;
        }

        self.proxy
            .iter()
            .find(|rule| rule.matches(path))
            .map_or(Route::NotFound, |rule| match &rule.target {
                RouteTarget::ReverseProxy(backend) => Route::Proxy(backend),
                RouteTarget::Transcoding => Route::Transcode,
            })
    }

    /// All rules in evaluation order.
    pub fn rules(&self) -> impl Iterator<Item = &RouteRule> {
        self.transcoding.iter().chain(self.proxy.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn backend(name: &str, port: u16) -> Arc<HttpBackend> {
        Arc::new(HttpBackend::new(name, &format!("http://127.0.0.1:{port}")).unwrap())
    }

    fn proxied_to<'a>(route: Route<'a>) -> Option<&'a str> {
        match route {
            Route::Proxy(b) => Some(b.name()),
            _ => None,
        }
    }

    fn default_classifier() -> RouteClassifier {
        let mut registry = BackendRegistry::new();
        for (name, port) in [("identity-http", 8080), ("tours-http", 8081), ("blogs-http", 8083)] {
            registry.insert_http(HttpBackend::new(name, &format!("http://127.0.0.1:{port}")).unwrap());
        }
        RouteClassifier::from_config(&GatewayConfig::default().routes, &registry).unwrap()
    }

    #[test]
    fn test_special_paths_win_over_proxy_prefix() {
        let classifier = default_classifier();

        assert!(matches!(
            classifier.classify("/api/tours/tour-executions/abandon"),
            Route::Transcode
        ));
        assert!(matches!(
            classifier.classify("/api/tours/tour-executions/complete"),
            Route::Transcode
        ));
        assert_eq!(
            proxied_to(classifier.classify("/api/tours/tour-executions/start")),
            Some("tours-http")
        );
    }

    #[test]
    fn test_precedence_independent_of_registration_order() {
        let tours = backend("tours-http", 8081);
        let classifier = RouteClassifier::new(vec![
            RouteRule::proxy(MatchKind::Prefix, "/api/tours/", tours),
            RouteRule::transcoding("/api/tours/tour-executions/abandon"),
        ]);

        assert!(matches!(
            classifier.classify("/api/tours/tour-executions/abandon"),
            Route::Transcode
        ));
    }

    #[test]
    fn test_default_table() {
        let classifier = default_classifier();

        assert!(matches!(classifier.classify("/api/auth"), Route::Transcode));
        assert!(matches!(classifier.classify("/api/auth/login"), Route::Transcode));
        assert_eq!(proxied_to(classifier.classify("/api/users")), Some("identity-http"));
        assert_eq!(proxied_to(classifier.classify("/api/users/3")), Some("identity-http"));
        assert_eq!(proxied_to(classifier.classify("/api/profile")), Some("identity-http"));
        assert_eq!(proxied_to(classifier.classify("/api/tours")), Some("tours-http"));
        assert_eq!(proxied_to(classifier.classify("/api/blogs/7/comments")), Some("blogs-http"));
    }

    #[test]
    fn test_no_match() {
        let classifier = default_classifier();

        assert!(matches!(classifier.classify("/"), Route::NotFound));
        assert!(matches!(classifier.classify("/api/toursx"), Route::NotFound));
        assert!(matches!(classifier.classify("/API/tours"), Route::NotFound));
        assert!(matches!(classifier.classify("/health"), Route::NotFound));
    }

    #[test]
    fn test_first_registered_wins() {
        let classifier = RouteClassifier::new(vec![
            RouteRule::proxy(MatchKind::Prefix, "/api/", backend("first", 1001)),
            RouteRule::proxy(MatchKind::Prefix, "/api/blogs/", backend("second", 1002)),
        ]);

        assert_eq!(proxied_to(classifier.classify("/api/blogs/1")), Some("first"));
    }

    #[test]
    fn test_unknown_backend_rejected() {
        let routes = vec![RouteConfig::proxy("/api/x", MatchKind::Exact, "missing")];
        let err = RouteClassifier::from_config(&routes, &BackendRegistry::new()).unwrap_err();

        assert!(matches!(err, RouteError::UnknownBackend { .. }));
    }

    #[test]
    fn test_rules_listed_in_evaluation_order() {
        let classifier = default_classifier();
        let patterns: Vec<_> = classifier.rules().map(RouteRule::pattern).collect();

        assert_eq!(patterns[0], "/api/auth");
        assert_eq!(patterns[3], "/api/users");
        assert_eq!(patterns.len(), 11);
    }
}
