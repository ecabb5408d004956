//! Pathway gateway library: datastore proxy plus KEGG gene/pathway aggregation.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod datastore;
pub mod error;
pub mod http;
pub mod kegg;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
