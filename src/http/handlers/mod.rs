//! Endpoint handlers, one module per concern.
//!
//! Handlers take the shared `AppState` and the `RouteMatch` produced by the
//! routing table; `server.rs` picks the handler from the matched `Endpoint`.

pub mod datastore;
pub mod info;
pub mod maintenance;

use crate::aggregate::split_list;
use crate::error::{GatewayError, GatewayResult};
use crate::routing::RouteMatch;

/// Decoded items of a space-separated path parameter.
pub(crate) fn list_param(route: &RouteMatch, name: &str) -> Vec<String> {
    route
        .decoded(name)
        .map(|value| split_list(&value))
        .unwrap_or_default()
}

/// First item of a path parameter; an empty parameter is a caller error.
pub(crate) fn first_param(route: &RouteMatch, name: &str) -> GatewayResult<String> {
    let value = route.decoded(name).unwrap_or_default();
    list_param(route, name)
        .into_iter()
        .next()
        .ok_or(GatewayError::MalformedIdentifier(value))
}
