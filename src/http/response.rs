//! Response construction and the cross-origin policy.
//!
//! # Responsibilities
//! - Attach `Access-Control-Allow-Origin: *` to every response
//! - Mirror upstream datastore responses byte-for-byte
//! - Map datastore failures to their fixed client-visible responses
//!
//! # Design Decisions
//! - The CORS header is set by a layer, so error and timeout responses carry it too
//! - A failed GET answers 404 with a short placeholder; a failed POST answers 500 with no body

use axum::{
    body::Body,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::datastore::ProxyResult;

/// Body returned when a proxied GET could not reach the datastore.
pub const GET_FALLBACK_BODY: &str = ":(";

/// Layer applying the permissive cross-origin policy.
pub fn allow_any_origin() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    )
}

/// Plain-text 200 response.
pub fn text(body: impl Into<String>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body.into(),
    )
        .into_response()
}

/// Upstream status and body, unchanged.
pub fn proxied(result: ProxyResult) -> Response {
    let mut response = Response::new(Body::from(result.body));
    *response.status_mut() = result.status;
    if let Some(content_type) = result.content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}

/// Upstream status with no body, for forwarded POSTs.
pub fn proxied_status(result: &ProxyResult) -> Response {
    result.status.into_response()
}

/// Fixed response for a datastore call that produced nothing.
pub fn upstream_failure(method: &Method) -> Response {
    if method == Method::GET {
        (StatusCode::NOT_FOUND, GET_FALLBACK_BODY).into_response()
    } else {
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
}
