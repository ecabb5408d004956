//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

use pathway_gateway::kegg::{Compound, Gene, Pathway, ReferenceError, ReferenceLibrary};
use pathway_gateway::{GatewayConfig, HttpServer, Shutdown};

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub target: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

fn status_line(status: u16) -> &'static str {
    match status {
        200 => "200 OK",
        201 => "201 Created",
        400 => "400 Bad Request",
        404 => "404 Not Found",
        500 => "500 Internal Server Error",
        502 => "502 Bad Gateway",
        503 => "503 Service Unavailable",
        _ => "200 OK",
    }
}

/// Read one HTTP/1.1 request (headers plus a Content-Length body).
async fn read_request(socket: &mut TcpStream) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break buf.len(),
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next().unwrap_or_default().split(' ');
    let method = request_line.next().unwrap_or_default().to_string();
    let target = request_line.next().unwrap_or_default().to_string();
    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    while buf.len() < header_end + length {
        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let end = buf.len().min(header_end + length);
    let body = String::from_utf8_lossy(&buf[header_end..end]).to_string();

    Captured {
        method,
        target,
        headers,
        body,
    }
}

/// Start a programmable mock backend. Every request is reported on the
/// returned channel and answered with the status and body `f` produces.
pub async fn start_programmable_backend<F, Fut>(f: F) -> (SocketAddr, mpsc::UnboundedReceiver<Captured>)
where
    F: Fn(Captured) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    let f = Arc::new(f);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let f = f.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                let captured = read_request(&mut socket).await;
                let _ = tx.send(captured.clone());
                let (status, body) = f(captured).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line(status),
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
                tokio::time::sleep(Duration::from_millis(10)).await;
            });
        }
    });

    (addr, rx)
}

/// Start a mock backend that returns a fixed 200 response.
pub async fn start_mock_backend(response: &'static str) -> SocketAddr {
    let (addr, _) = start_programmable_backend(move |_| async move { (200, response.to_string()) }).await;
    addr
}

/// Start a backend that omits Content-Length and ends the body by closing
/// the connection, writing it in several delayed chunks.
pub async fn start_close_delimited_backend(chunks: &'static [&'static str]) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_request(&mut socket).await;
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\nConnection: close\r\n\r\n")
                    .await;
                for chunk in chunks {
                    let _ = socket.write_all(chunk.as_bytes()).await;
                    let _ = socket.flush().await;
                    tokio::time::sleep(Duration::from_millis(20)).await;
                }
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

/// Start a backend that reads each request and never answers it.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let _ = read_request(&mut socket).await;
                tokio::time::sleep(Duration::from_secs(60)).await;
                drop(socket);
            });
        }
    });

    addr
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// In-memory reference library keyed by pathway and gene ID.
#[derive(Default)]
pub struct FakeLibrary {
    pathways: HashMap<String, Vec<String>>,
    genes: HashMap<String, Vec<String>>,
    symbols: HashMap<String, String>,
}

impl FakeLibrary {
    pub fn with_pathway(mut self, id: &str, genes: &[&str]) -> Self {
        self.pathways
            .insert(id.into(), genes.iter().map(|g| g.to_string()).collect());
        self
    }

    pub fn with_gene(mut self, id: &str, symbol: &str, pathways: &[&str]) -> Self {
        self.genes
            .insert(id.into(), pathways.iter().map(|p| p.to_string()).collect());
        self.symbols.insert(symbol.into(), format!("hsa:{}", id));
        self
    }
}

#[async_trait]
impl ReferenceLibrary for FakeLibrary {
    fn organism(&self) -> &str {
        "hsa"
    }

    async fn get_pathway(&self, id: &str) -> Result<Pathway, ReferenceError> {
        let genes = self
            .pathways
            .get(id)
            .ok_or_else(|| ReferenceError::NotFound(id.to_string()))?;
        Ok(Pathway {
            id: id.to_string(),
            name: format!("Pathway {} - Homo sapiens (human)", id),
            genes: genes.clone(),
            ..Default::default()
        })
    }

    async fn get_gene(&self, id: &str) -> Result<Gene, ReferenceError> {
        let pathways = self
            .genes
            .get(id)
            .ok_or_else(|| ReferenceError::NotFound(id.to_string()))?;
        Ok(Gene {
            id: id.to_string(),
            pathways: pathways.clone(),
            ..Default::default()
        })
    }

    async fn get_compound(&self, id: &str) -> Result<Compound, ReferenceError> {
        Err(ReferenceError::NotFound(id.to_string()))
    }

    async fn gene_id_from_name(&self, name: &str) -> Result<String, ReferenceError> {
        self.symbols
            .get(name)
            .cloned()
            .ok_or_else(|| ReferenceError::NotFound(name.to_string()))
    }
}

/// A running gateway under test.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    _shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a gateway in front of `datastore` using `library` for lookups.
pub async fn start_gateway(
    datastore: SocketAddr,
    library: FakeLibrary,
    configure: impl FnOnce(&mut GatewayConfig),
) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.datastore.base_url = format!("http://{}/", datastore);
    config.datastore.timeout_secs = 5;
    configure(&mut config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let server = HttpServer::with_reference(config, Arc::new(library));
    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestGateway {
        addr,
        client,
        _shutdown: shutdown,
    }
}
