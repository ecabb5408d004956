//! Upstream datastore subsystem.
//!
//! # Data Flow
//! ```text
//! /datastore/{sub-path} (GET or POST)
//!     → client.rs (base URL + sub-path, single attempt under a deadline)
//!     → ProxyResult (status + body, byte-for-byte)
//!     → http/handlers/datastore.rs (mirror or fall back)
//! ```
//!
//! # Design Decisions
//! - Sub-paths and payloads are opaque; nothing is parsed or rewritten
//! - Bodies are read to end-of-stream, never trusted to a length header
//! - No retries

pub mod client;

pub use client::{DatastoreClient, ProxyResult, UpstreamError};
