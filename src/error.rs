//! Gateway error taxonomy and its HTTP mapping.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::datastore::UpstreamError;
use crate::http::response;
use crate::kegg::ReferenceError;

/// Result type alias for handler operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors a request can fail with.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The datastore could not be reached or did not answer in time.
    /// Clients see 404 `:(` for GET and an empty 500 otherwise.
    #[error("Upstream datastore unavailable for {method}: {source}")]
    UpstreamUnavailable {
        method: Method,
        #[source]
        source: UpstreamError,
    },

    /// Caller-supplied identifier lacks the expected `namespace:` prefix.
    #[error("Malformed identifier '{0}': expected '<namespace>:<id>'")]
    MalformedIdentifier(String),

    /// The reference library could not resolve an identifier.
    #[error("Reference lookup failed: {0}")]
    ReferenceLookupFailed(#[from] ReferenceError),

    /// The cache directory could not be emptied.
    #[error("Cache reset failed: {0}")]
    CacheReset(String),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::UpstreamUnavailable { method, .. } if method == Method::GET => {
                StatusCode::NOT_FOUND
            }
            GatewayError::UpstreamUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::MalformedIdentifier(_) => StatusCode::BAD_REQUEST,
            GatewayError::ReferenceLookupFailed(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            GatewayError::ReferenceLookupFailed(_) => StatusCode::BAD_GATEWAY,
            GatewayError::CacheReset(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        if let GatewayError::UpstreamUnavailable { method, .. } = &self {
            tracing::error!(error = %self, "Request to datastore failed");
            return response::upstream_failure(method);
        }

        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(error = %self, "Request rejected");
        }
        (status, self.to_string()).into_response()
    }
}
