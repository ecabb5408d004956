//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with a single dispatching handler
//! - Wire up middleware (tracing, request ID, CORS header, timeout, body limit)
//! - Dispatch requests through the routing table to endpoint handlers
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    limit::RequestBodyLimitLayer, services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::cache::CacheDir;
use crate::config::GatewayConfig;
use crate::datastore::DatastoreClient;
use crate::error::GatewayResult;
use crate::http::handlers::{datastore, info, maintenance};
use crate::http::request::{self, RequestIdExt};
use crate::http::response;
use crate::kegg::{KeggClient, ReferenceError, ReferenceLibrary};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::routing::{Endpoint, RouteResult, RoutingTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RoutingTable>,
    pub datastore: DatastoreClient,
    pub reference: Arc<dyn ReferenceLibrary>,
    pub cache: CacheDir,
    pub public: ServeDir,
    pub max_request_bytes: usize,
    pub lookup_concurrency: usize,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl HttpServer {
    /// Create a server backed by the KEGG REST client.
    pub fn new(config: GatewayConfig) -> Result<Self, ReferenceError> {
        let reference = Arc::new(KeggClient::new(&config.reference)?);
        Ok(Self::with_reference(config, reference))
    }

    /// Create a server with an explicit reference library.
    pub fn with_reference(config: GatewayConfig, reference: Arc<dyn ReferenceLibrary>) -> Self {
        let state = AppState {
            routes: Arc::new(RoutingTable::gateway()),
            datastore: DatastoreClient::new(&config.datastore),
            reference,
            cache: CacheDir::new(&config.cache.dir),
            public: ServeDir::new(&config.public.dir),
            max_request_bytes: config.datastore.max_request_bytes,
            lookup_concurrency: config.reference.max_concurrency,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config: Arc::new(config),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(RequestBodyLimitLayer::new(config.datastore.max_request_bytes))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(response::allow_any_origin())
            .layer(request::propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %req.method(),
                    path = %req.uri().path(),
                    request_id = %req.headers().request_id(),
                )
            }))
            .layer(request::set_request_id_layer())
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            datastore = %self.config.datastore.base_url,
            reference = %self.config.reference.base_url,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Single entry point: resolve the route, run its handler, record metrics.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = parts.headers.request_id().to_string();
    let method = parts.method.clone();
    let path = parts.uri.path();
    let query = parts.uri.query();

    let route = match state.routes.resolve(&method, path) {
        RouteResult::Matched(route) => route,
        RouteResult::MethodNotAllowed => {
            tracing::warn!(request_id = %request_id, method = %method, path = %path, "Method not allowed");
            metrics::record_request(method.as_str(), 405, "none", start_time);
            return (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed").into_response();
        }
        RouteResult::NotFound => {
            tracing::warn!(request_id = %request_id, path = %path, "No route matched");
            metrics::record_request(method.as_str(), 404, "none", start_time);
            return (StatusCode::NOT_FOUND, "No matching route found").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id,
        endpoint = route.endpoint.name(),
        path = %path,
        "Dispatching request"
    );

    let response = match route.endpoint {
        Endpoint::DatastoreGet => {
            respond(datastore::proxy_get(&state, &route, query, &request_id).await)
        }
        Endpoint::DatastorePost => {
            respond(datastore::proxy_post(&state, &route, query, body, &request_id).await)
        }
        Endpoint::CommonGenes => respond(info::common_genes(&state, &route).await),
        Endpoint::CommonPathways => respond(info::common_pathways(&state, &route).await),
        Endpoint::GenePathways => respond(info::gene_pathways(&state, &route).await),
        Endpoint::PathwayName => respond(info::pathway_name(&state, &route).await),
        Endpoint::Info => respond(info::info(&state, &route).await),
        Endpoint::GeneIdFromName => respond(info::gene_id_from_name(&state, &route).await),
        Endpoint::ResetCache => respond(maintenance::reset_cache(&state, &request_id).await),
        Endpoint::Public => maintenance::public_file(&state, &route).await,
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        route.endpoint.name(),
        start_time,
    );
    response
}

fn respond(result: GatewayResult<Response>) -> Response {
    result.unwrap_or_else(IntoResponse::into_response)
}
