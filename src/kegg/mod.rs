//! Reference library subsystem (KEGG).
//!
//! # Data Flow
//! ```text
//! handler / aggregator
//!     → ReferenceLibrary trait (get_pathway, get_gene, pathways, ...)
//!     → client.rs (KEGG REST fetch, in-memory memo)
//!     → flatfile.rs (DBGET flat-file sections)
//!     → types.rs (Pathway, Gene, Compound)
//! ```
//!
//! # Design Decisions
//! - The gateway only composes what the library returns; no data is corrected
//! - The memo lives for the process lifetime and is dropped by `/resetcache`
//! - Every failure surfaces as a `ReferenceError`, never a panic

pub mod client;
pub mod flatfile;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use client::KeggClient;
pub use types::{Compound, Gene, Pathway, PathwayList};

/// Errors raised by reference-library lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    /// The identifier is unknown to the library.
    #[error("'{0}' not found in reference library")]
    NotFound(String),

    /// The library could not be reached or the request timed out.
    #[error("reference library request failed: {0}")]
    Transport(String),

    /// The library answered with an unexpected HTTP status.
    #[error("reference library returned HTTP {status} for '{id}'")]
    Status { id: String, status: u16 },

    /// The entry could not be interpreted.
    #[error("could not parse reference entry '{id}': {reason}")]
    Parse { id: String, reason: String },
}

impl ReferenceError {
    /// True when the caller asked for something the library does not have.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReferenceError::NotFound(_))
    }
}

/// Gene and pathway lookups the gateway relies on.
///
/// Implementations may be slow and may fail; callers never retry.
#[async_trait]
pub trait ReferenceLibrary: Send + Sync {
    /// Organism code genes are namespaced with (e.g. `hsa`).
    fn organism(&self) -> &str;

    /// Fetch a pathway and its member genes.
    async fn get_pathway(&self, id: &str) -> Result<Pathway, ReferenceError>;

    /// Fetch a gene by its un-prefixed identifier (`"7157"`, not `"hsa:7157"`).
    async fn get_gene(&self, id: &str) -> Result<Gene, ReferenceError>;

    /// Fetch a compound by its un-prefixed identifier (`"C00031"`).
    async fn get_compound(&self, id: &str) -> Result<Compound, ReferenceError>;

    /// Resolve a gene symbol to its namespaced identifier.
    async fn gene_id_from_name(&self, name: &str) -> Result<String, ReferenceError>;

    /// Pathways a gene participates in.
    fn pathways(&self, gene: &Gene) -> Vec<String> {
        gene.pathways.clone()
    }

    /// Human-readable pathway name without the organism suffix.
    async fn pathway_name(&self, id: &str) -> Result<String, ReferenceError> {
        let pathway = self.get_pathway(id).await?;
        Ok(pathway.readable_name().to_string())
    }

    /// Drop any memoized entries.
    fn clear_cache(&self) {}
}
