//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the ordered routing table
//! - Look up the endpoint for a method + path
//! - Return matched route, method mismatch, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over routes (acceptable for the handful the gateway serves)
//! - First match wins, so specific patterns are listed before generic ones

use axum::http::Method;

use crate::routing::matcher::PathPattern;

/// Handlers the gateway can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    CommonGenes,
    CommonPathways,
    GenePathways,
    PathwayName,
    Info,
    DatastoreGet,
    DatastorePost,
    GeneIdFromName,
    ResetCache,
    Public,
}

impl Endpoint {
    /// Stable label for logs and metrics.
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::CommonGenes => "common_genes",
            Endpoint::CommonPathways => "common_pathways",
            Endpoint::GenePathways => "gene_pathways",
            Endpoint::PathwayName => "pathway_name",
            Endpoint::Info => "info",
            Endpoint::DatastoreGet => "datastore_get",
            Endpoint::DatastorePost => "datastore_post",
            Endpoint::GeneIdFromName => "gene_id_from_name",
            Endpoint::ResetCache => "reset_cache",
            Endpoint::Public => "public",
        }
    }
}

/// One routing table entry.
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub pattern: PathPattern,
    pub endpoint: Endpoint,
}

/// A successful lookup with its captured path parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub endpoint: Endpoint,
    params: Vec<(String, String)>,
}

impl RouteMatch {
    /// Captured value exactly as it appeared in the request path.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Captured value, percent-decoded, with `+` read as a space.
    pub fn decoded(&self, name: &str) -> Option<String> {
        let raw = self.raw(name)?.replace('+', " ");
        match urlencoding::decode(&raw) {
            Ok(value) => Some(value.into_owned()),
            Err(_) => Some(raw),
        }
    }
}

/// Result of a routing table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteResult {
    Matched(RouteMatch),
    MethodNotAllowed,
    NotFound,
}

/// Ordered routing table.
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    routes: Vec<Route>,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route; earlier routes take precedence.
    pub fn route(mut self, method: Method, pattern: &str, endpoint: Endpoint) -> Self {
        self.routes.push(Route {
            method,
            pattern: PathPattern::new(pattern),
            endpoint,
        });
        self
    }

    /// The table the gateway serves.
    pub fn gateway() -> Self {
        Self::new()
            .route(Method::GET, "/info/pathway/{pathways}/commongenes", Endpoint::CommonGenes)
            .route(Method::GET, "/info/gene/{genes}/commonpathways", Endpoint::CommonPathways)
            .route(Method::GET, "/info/gene/{gene}/pathways", Endpoint::GenePathways)
            .route(Method::GET, "/info/pathway/{id}/name", Endpoint::PathwayName)
            .route(Method::GET, "/info/{items}/{infotype}", Endpoint::Info)
            .route(Method::GET, "/datastore/{*rest}", Endpoint::DatastoreGet)
            .route(Method::POST, "/datastore/{*rest}", Endpoint::DatastorePost)
            .route(Method::GET, "/geneid/{name}", Endpoint::GeneIdFromName)
            .route(Method::GET, "/resetcache", Endpoint::ResetCache)
            .route(Method::GET, "/resetcache/", Endpoint::ResetCache)
            .route(Method::GET, "/public/{*rest}", Endpoint::Public)
    }

    /// Find the first route matching `method` and `path`.
    pub fn resolve(&self, method: &Method, path: &str) -> RouteResult {
        let mut path_matched = false;

        for route in &self.routes {
            let Some(params) = route.pattern.captures(path) else {
                continue;
            };
            if route.method == *method {
                return RouteResult::Matched(RouteMatch {
                    endpoint: route.endpoint,
                    params,
                });
            }
            path_matched = true;
        }

        if path_matched {
            RouteResult::MethodNotAllowed
        } else {
            RouteResult::NotFound
        }
    }
}
