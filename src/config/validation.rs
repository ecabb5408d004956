//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject upstream URLs the proxy cannot speak to
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' is not an http(s) URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("reference.organism '{0}' must be a non-empty alphanumeric KEGG code")]
    InvalidOrganism(String),

    #[error("cache.dir '{0}' must name a directory below a filesystem root")]
    InvalidCacheDir(String),
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_url(&mut errors, "datastore.base_url", &config.datastore.base_url);
    check_url(&mut errors, "reference.base_url", &config.reference.base_url);

    let positive = [
        ("datastore.timeout_secs", config.datastore.timeout_secs),
        ("datastore.connect_timeout_secs", config.datastore.connect_timeout_secs),
        ("datastore.max_response_bytes", config.datastore.max_response_bytes as u64),
        ("datastore.max_request_bytes", config.datastore.max_request_bytes as u64),
        ("reference.timeout_secs", config.reference.timeout_secs),
        ("reference.max_concurrency", config.reference.max_concurrency as u64),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, value) in positive {
        if value == 0 {
            errors.push(ValidationError::ZeroValue { field });
        }
    }

    let organism = &config.reference.organism;
    if organism.is_empty() || !organism.chars().all(|c| c.is_ascii_alphanumeric()) {
        errors.push(ValidationError::InvalidOrganism(organism.clone()));
    }

    let cache_dir = Path::new(&config.cache.dir);
    if config.cache.dir.trim().is_empty() || cache_dir.parent().is_none() {
        errors.push(ValidationError::InvalidCacheDir(config.cache.dir.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let ok = Url::parse(value)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.host().is_some())
        .unwrap_or(false);
    if !ok {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
