//! Outbound HTTP client for the datastore.

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderValue, Method, Request, StatusCode, Uri};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::config::DatastoreConfig;
use crate::resilience::{with_deadline, DeadlineExceeded};

/// Content type every forwarded payload is labelled with.
pub const PAYLOAD_CONTENT_TYPE: &str = "text/plain";

/// Outcome of one upstream call.
#[derive(Debug, Clone)]
pub struct ProxyResult {
    pub status: StatusCode,
    pub body: Bytes,
    /// Upstream `Content-Type`, when it sent one.
    pub content_type: Option<HeaderValue>,
}

/// Reasons an upstream call produced no usable response.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream URL '{0}'")]
    InvalidUrl(String),

    #[error("upstream request failed: {0}")]
    Transport(String),

    #[error("reading upstream response failed: {0}")]
    Body(String),

    #[error("upstream call timed out: {0}")]
    Timeout(#[from] DeadlineExceeded),
}

/// Forwards requests to the configured datastore.
#[derive(Clone)]
pub struct DatastoreClient {
    base_url: String,
    client: Client<HttpConnector, Body>,
    timeout: Duration,
    max_response_bytes: usize,
}

impl DatastoreClient {
    pub fn new(config: &DatastoreConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout_secs)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            base_url: config.base_url.clone(),
            client,
            timeout: Duration::from_secs(config.timeout_secs),
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// Upstream URL for a sub-path: base URL, exactly one `/`, sub-path, query.
    pub fn upstream_url(&self, sub_path: &str, query: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            sub_path.trim_start_matches('/')
        );
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// Issue one request upstream and return its status and full body.
    ///
    /// `payload` is sent only for POST, labelled `text/plain`.
    pub async fn forward(
        &self,
        method: Method,
        sub_path: &str,
        query: Option<&str>,
        payload: Bytes,
    ) -> Result<ProxyResult, UpstreamError> {
        let url = self.upstream_url(sub_path, query);
        let uri: Uri = url
            .parse()
            .map_err(|_| UpstreamError::InvalidUrl(url.clone()))?;

        let builder = Request::builder().method(method.clone()).uri(uri);
        let request = if method == Method::POST {
            builder
                .header(header::CONTENT_TYPE, PAYLOAD_CONTENT_TYPE)
                .body(Body::from(payload))
        } else {
            builder.body(Body::empty())
        }
        .map_err(|_| UpstreamError::InvalidUrl(url.clone()))?;

        tracing::debug!(method = %method, upstream = %url, "Forwarding to datastore");

        with_deadline(self.timeout, self.exchange(request)).await?
    }

    async fn exchange(&self, request: Request<Body>) -> Result<ProxyResult, UpstreamError> {
        let response = self
            .client
            .request(request)
            .await
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        if !response.headers().contains_key(header::CONTENT_LENGTH) {
            tracing::debug!(status = %status, "Upstream sent no length, reading to end of stream");
        }

        let body = axum::body::to_bytes(Body::new(response.into_body()), self.max_response_bytes)
            .await
            .map_err(|e| UpstreamError::Body(e.to_string()))?;

        Ok(ProxyResult {
            status,
            body,
            content_type,
        })
    }
}
