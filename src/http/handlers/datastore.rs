//! `/datastore/{*rest}` proxy handlers.

use axum::{
    body::{Body, Bytes},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::error::{GatewayError, GatewayResult};
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::RouteMatch;

/// Forward a GET and mirror the upstream status and body.
pub async fn proxy_get(
    state: &AppState,
    route: &RouteMatch,
    query: Option<&str>,
    request_id: &str,
) -> GatewayResult<Response> {
    let sub_path = route.raw("rest").unwrap_or_default();

    let result = state
        .datastore
        .forward(Method::GET, sub_path, query, Bytes::new())
        .await
        .map_err(|source| {
            metrics::record_upstream("GET", "error");
            GatewayError::UpstreamUnavailable {
                method: Method::GET,
                source,
            }
        })?;

    metrics::record_upstream("GET", "ok");
    tracing::debug!(
        request_id = %request_id,
        status = %result.status,
        bytes = result.body.len(),
        "Datastore responded"
    );
    Ok(response::proxied(result))
}

/// Forward a POST payload; the upstream status is mirrored without a body.
pub async fn proxy_post(
    state: &AppState,
    route: &RouteMatch,
    query: Option<&str>,
    body: Body,
    request_id: &str,
) -> GatewayResult<Response> {
    let sub_path = route.raw("rest").unwrap_or_default();

    let payload = match axum::body::to_bytes(body, state.max_request_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Rejected datastore payload");
            return Ok((StatusCode::PAYLOAD_TOO_LARGE, "Payload too large").into_response());
        }
    };

    let result = state
        .datastore
        .forward(Method::POST, sub_path, query, payload)
        .await
        .map_err(|source| {
            metrics::record_upstream("POST", "error");
            GatewayError::UpstreamUnavailable {
                method: Method::POST,
                source,
            }
        })?;

    metrics::record_upstream("POST", "ok");
    Ok(response::proxied_status(&result))
}
