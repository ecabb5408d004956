//! Cache reset and static files.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;

use crate::error::{GatewayError, GatewayResult};
use crate::http::response;
use crate::http::server::AppState;
use crate::routing::RouteMatch;

/// Drop the reference memo and empty the cache directory.
pub async fn reset_cache(state: &AppState, request_id: &str) -> GatewayResult<Response> {
    tracing::warn!(
        request_id = %request_id,
        dir = %state.cache.path().display(),
        "Clearing cache"
    );

    state.reference.clear_cache();

    let cache = state.cache.clone();
    let removed = tokio::task::spawn_blocking(move || cache.clear())
        .await
        .map_err(|e| GatewayError::CacheReset(e.to_string()))?
        .map_err(|e| GatewayError::CacheReset(e.to_string()))?;

    tracing::info!(request_id = %request_id, removed, "Cache reset complete");
    Ok(response::text("ok"))
}

/// Serve a file from the public directory.
pub async fn public_file(state: &AppState, route: &RouteMatch) -> Response {
    let rest = route.raw("rest").unwrap_or_default();

    let request = match Request::builder()
        .method(Method::GET)
        .uri(format!("/{}", rest))
        .body(Body::empty())
    {
        Ok(request) => request,
        Err(_) => return (StatusCode::BAD_REQUEST, "Invalid file path").into_response(),
    };

    match state.public.clone().oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}
