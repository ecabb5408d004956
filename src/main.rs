//! Pathway gateway.
//!
//! A small REST gateway in front of an opaque datastore service and the KEGG
//! reference library.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ routing table ──┬──▶ datastore proxy ──▶ Datastore
//!                     (request id,                    │
//!                      trace, CORS,                   ├──▶ info / aggregate ──▶ KEGG REST
//!                      timeout)                       │       (memoized)
//!                                                     ├──▶ resetcache
//!                                                     └──▶ public files
//!
//!     Cross-cutting: config (TOML + CLI), tracing logs, Prometheus metrics,
//!     graceful shutdown on SIGINT/SIGTERM
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use pathway_gateway::config::{self, ConfigError, GatewayConfig};
use pathway_gateway::observability;
use pathway_gateway::{HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "pathway-gateway", version, about = "Datastore proxy and KEGG pathway gateway")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen IP, overrides listener.bind_address
    #[arg(long)]
    ip: Option<IpAddr>,

    /// Listen port, overrides listener.bind_address
    #[arg(short, long)]
    port: Option<u16>,

    /// Datastore base URL, overrides datastore.base_url
    #[arg(long)]
    datastore: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
        let bind = match (self.ip, self.port) {
            (Some(ip), Some(port)) => Some(SocketAddr::new(ip, port)),
            (None, None) => None,
            (ip, port) => {
                let current: SocketAddr = config.listener.bind_address.parse()?;
                Some(SocketAddr::new(
                    ip.unwrap_or(current.ip()),
                    port.unwrap_or(current.port()),
                ))
            }
        };
        if let Some(bind) = bind {
            config.listener.bind_address = bind.to_string();
        }
        if let Some(datastore) = &self.datastore {
            config.datastore.base_url = datastore.clone();
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => GatewayConfig::default(),
    };
    cli.apply(&mut config)?;
    config::validate_config(&config).map_err(ConfigError::Validation)?;

    observability::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pathway-gateway starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        datastore = %config.datastore.base_url,
        organism = %config.reference.organism,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        if let Err(e) = observability::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_before_validation() {
        let mut config = config::loader::parse_config(
            "[listener]\nbind_address = \"nowhere\"\n[datastore]\nbase_url = \"not a url\"\n",
        )
        .unwrap();
        assert!(config::validate_config(&config).is_err());

        let cli = Cli::parse_from([
            "pathway-gateway",
            "--ip",
            "127.0.0.1",
            "--port",
            "9000",
            "--datastore",
            "http://datastore.internal:8888/",
        ]);
        cli.apply(&mut config).unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.datastore.base_url, "http://datastore.internal:8888/");
        assert!(config::validate_config(&config).is_ok());
    }

    #[test]
    fn test_port_alone_keeps_configured_ip() {
        let mut config = GatewayConfig::default();
        Cli::parse_from(["pathway-gateway", "--port", "9999"])
            .apply(&mut config)
            .unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:9999");
    }
}
