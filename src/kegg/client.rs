//! KEGG REST client.
//!
//! # Responsibilities
//! - Fetch DBGET flat files (`/get/...`) and name searches (`/find/...`)
//! - Memoize raw responses per request path for the process lifetime
//! - Map HTTP outcomes onto `ReferenceError`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use reqwest::StatusCode;

use crate::config::ReferenceConfig;
use crate::kegg::flatfile::FlatEntry;
use crate::kegg::types::{Compound, Gene, Pathway};
use crate::kegg::{ReferenceError, ReferenceLibrary};
use crate::observability::metrics;

/// Reference library backed by the KEGG REST API.
pub struct KeggClient {
    http: reqwest::Client,
    base_url: String,
    organism: String,
    memo: DashMap<String, Arc<str>>,
}

impl KeggClient {
    pub fn new(config: &ReferenceConfig) -> Result<Self, ReferenceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("pathway-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReferenceError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            organism: config.organism.clone(),
            memo: DashMap::new(),
        })
    }

    #[cfg(test)]
    fn memo_len(&self) -> usize {
        self.memo.len()
    }

    async fn fetch(&self, path: &str) -> Result<Arc<str>, ReferenceError> {
        if let Some(hit) = self.memo.get(path) {
            return Ok(hit.value().clone());
        }

        let kind = path.split('/').next().unwrap_or("unknown");
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(url = %url, "Reference lookup");

        let result = self.fetch_uncached(path, &url).await;
        metrics::record_reference_lookup(kind, if result.is_ok() { "ok" } else { "error" });

        let text: Arc<str> = Arc::from(result?);
        self.memo.insert(path.to_string(), text.clone());
        Ok(text)
    }

    async fn fetch_uncached(&self, path: &str, url: &str) -> Result<String, ReferenceError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| ReferenceError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ReferenceError::NotFound(path.to_string())),
            status if !status.is_success() => {
                return Err(ReferenceError::Status {
                    id: path.to_string(),
                    status: status.as_u16(),
                })
            }
            _ => {}
        }

        let text = response
            .text()
            .await
            .map_err(|e| ReferenceError::Transport(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(ReferenceError::NotFound(path.to_string()));
        }
        Ok(text)
    }

    async fn entry(&self, path: &str) -> Result<FlatEntry, ReferenceError> {
        let text = self.fetch(path).await?;
        FlatEntry::parse(&text).ok_or_else(|| ReferenceError::Parse {
            id: path.to_string(),
            reason: "response is not a flat-file entry".to_string(),
        })
    }
}

#[async_trait]
impl ReferenceLibrary for KeggClient {
    fn organism(&self) -> &str {
        &self.organism
    }

    async fn get_pathway(&self, id: &str) -> Result<Pathway, ReferenceError> {
        Pathway::from_entry(&self.entry(&format!("get/{}", id)).await?)
    }

    async fn get_gene(&self, id: &str) -> Result<Gene, ReferenceError> {
        Gene::from_entry(&self.entry(&format!("get/{}:{}", self.organism, id)).await?)
    }

    async fn get_compound(&self, id: &str) -> Result<Compound, ReferenceError> {
        Compound::from_entry(&self.entry(&format!("get/cpd:{}", id)).await?)
    }

    async fn gene_id_from_name(&self, name: &str) -> Result<String, ReferenceError> {
        let path = format!("find/{}/{}", self.organism, urlencoding::encode(name));
        let text = self.fetch(&path).await?;
        best_name_match(&text, name).ok_or_else(|| ReferenceError::NotFound(name.to_string()))
    }

    fn clear_cache(&self) {
        let dropped = self.memo.len();
        self.memo.clear();
        tracing::info!(dropped, "Reference memo cleared");
    }
}

/// Pick the ID from `find` output whose symbol list names `name` exactly,
/// falling back to the first hit.
///
/// Lines look like `hsa:7157\tTP53, BCC7, LFS1; tumor protein p53`.
fn best_name_match(find_output: &str, name: &str) -> Option<String> {
    let hits: Vec<(&str, &str)> = find_output
        .lines()
        .filter_map(|line| line.split_once('\t'))
        .collect();

    hits.iter()
        .find(|(_, description)| {
            let symbols = description.split(';').next().unwrap_or("");
            symbols
                .split(',')
                .any(|symbol| symbol.trim().eq_ignore_ascii_case(name))
        })
        .or_else(|| hits.first())
        .map(|(id, _)| id.trim().to_string())
}
