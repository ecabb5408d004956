//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream datastore the `/datastore/` endpoints forward to.
    pub datastore: DatastoreConfig,

    /// Reference library (KEGG REST) settings.
    pub reference: ReferenceConfig,

    /// Cache directory wiped by `/resetcache`.
    pub cache: CacheConfig,

    /// Static files served under `/public/`.
    pub public: PublicConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream datastore configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatastoreConfig {
    /// Base URL the proxied sub-path is appended to.
    pub base_url: String,

    /// Deadline for one forwarded call (connect, send, read body).
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Largest upstream response body accepted.
    pub max_response_bytes: usize,

    /// Largest inbound POST payload forwarded.
    pub max_request_bytes: usize,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8888/".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
            max_response_bytes: 100 * 1024 * 1024,
            max_request_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Reference library configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// KEGG REST endpoint.
    pub base_url: String,

    /// KEGG organism code used as gene namespace (e.g., "hsa").
    pub organism: String,

    /// Per-lookup timeout in seconds.
    pub timeout_secs: u64,

    /// Lookups one aggregation request may have in flight at once.
    pub max_concurrency: usize,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://rest.kegg.jp".to_string(),
            organism: "hsa".to_string(),
            timeout_secs: 30,
            max_concurrency: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: "cache".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PublicConfig {
    pub dir: String,
}

impl Default for PublicConfig {
    fn default() -> Self {
        Self {
            dir: "public".to_string(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 60 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
