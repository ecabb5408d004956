//! Gene/pathway membership aggregation.
//!
//! Both operations build a per-request count mapping from reference-library
//! lookups and never share state between requests. Every entry in a mapping
//! has a count of at least one. At most `concurrency` lookups are in flight
//! per request.

use std::collections::HashMap;

use futures_util::{stream, StreamExt, TryStreamExt};

use crate::error::{GatewayError, GatewayResult};
use crate::kegg::ReferenceLibrary;

/// Split a path-embedded list (`"hsa:1 hsa:2"`) into its non-empty items.
pub fn split_list(items: &str) -> Vec<String> {
    items.split_whitespace().map(str::to_string).collect()
}

/// Strip the namespace from a gene ID: `"hsa:7157"` → `"7157"`.
pub fn strip_namespace(gene_id: &str) -> GatewayResult<&str> {
    match gene_id.split_once(':') {
        Some((_, id)) if !id.is_empty() => Ok(id),
        _ => Err(GatewayError::MalformedIdentifier(gene_id.to_string())),
    }
}

/// Count every occurrence of every key across `lists`.
pub fn tally<'a, I, L>(lists: I) -> HashMap<String, usize>
where
    I: IntoIterator<Item = L>,
    L: IntoIterator<Item = &'a String>,
{
    let mut counts = HashMap::new();
    for list in lists {
        for key in list {
            *counts.entry(key.clone()).or_insert(0) += 1;
        }
    }
    counts
}

/// Number of distinct genes occurring more than once across the given gene lists.
pub fn count_shared(gene_lists: &[Vec<String>]) -> usize {
    tally(gene_lists).values().filter(|&&count| count > 1).count()
}

/// Number of genes shared by at least two of the given pathways.
///
/// Pathway IDs are treated as a set. Fewer than two distinct IDs yield 0
/// without any lookup.
pub async fn common_gene_count(
    library: &dyn ReferenceLibrary,
    pathway_ids: &[String],
    concurrency: usize,
) -> GatewayResult<usize> {
    let mut distinct: Vec<&String> = Vec::with_capacity(pathway_ids.len());
    for id in pathway_ids {
        if !distinct.contains(&id) {
            distinct.push(id);
        }
    }
    if distinct.len() < 2 {
        return Ok(0);
    }

    let gene_lists: Vec<Vec<String>> = stream::iter(distinct)
        .map(|id| library.get_pathway(id))
        .buffered(concurrency.max(1))
        .boxed()
        .map_ok(|pathway| pathway.genes)
        .try_collect()
        .await?;

    Ok(count_shared(&gene_lists))
}

/// For each pathway, how many of the given genes participate in it.
///
/// Every ID is checked for a namespace before any lookup is made.
pub async fn pathway_frequency(
    library: &dyn ReferenceLibrary,
    gene_ids: &[String],
    concurrency: usize,
) -> GatewayResult<HashMap<String, usize>> {
    let stripped = gene_ids
        .iter()
        .map(|id| strip_namespace(id))
        .collect::<GatewayResult<Vec<_>>>()?;

    let memberships: Vec<Vec<String>> = stream::iter(stripped)
        .map(|id| library.get_gene(id))
        .buffered(concurrency.max(1))
        .boxed()
        .map_ok(|gene| library.pathways(&gene))
        .try_collect()
        .await?;

    Ok(tally(&memberships))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kegg::{Compound, Gene, Pathway, ReferenceError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// In-memory reference library.
    #[derive(Default)]
    struct FakeLibrary {
        pathways: HashMap<String, Vec<String>>,
        genes: HashMap<String, Vec<String>>,
        lookups: AtomicUsize,
        latency: Option<Duration>,
        in_flight: AtomicUsize,
        peak_in_flight: AtomicUsize,
    }

    impl FakeLibrary {
        fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = Some(latency);
            self
        }

        async fn lookup(&self) {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }

        fn with_pathway(mut self, id: &str, genes: &[&str]) -> Self {
            self.pathways
                .insert(id.into(), genes.iter().map(|g| g.to_string()).collect());
            self
        }

        fn with_gene(mut self, id: &str, pathways: &[&str]) -> Self {
            self.genes
                .insert(id.into(), pathways.iter().map(|p| p.to_string()).collect());
            self
        }
    }

    #[async_trait]
    impl ReferenceLibrary for FakeLibrary {
        fn organism(&self) -> &str {
            "hsa"
        }

        async fn get_pathway(&self, id: &str) -> Result<Pathway, ReferenceError> {
            self.lookup().await;
            let genes = self
                .pathways
                .get(id)
                .ok_or_else(|| ReferenceError::NotFound(id.to_string()))?;
            Ok(Pathway {
                id: id.to_string(),
                name: format!("{} - Homo sapiens (human)", id),
                genes: genes.clone(),
                ..Default::default()
            })
        }

        async fn get_gene(&self, id: &str) -> Result<Gene, ReferenceError> {
            self.lookup().await;
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
            Err(ReferenceError::NotFound(name.to_string()))
        }
    }

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_two_shared_genes() {
        let lib = FakeLibrary::default()
            .with_pathway("P1", &["g1", "g2", "g3"])
            .with_pathway("P2", &["g2", "g3", "g4"]);
        assert_eq!(common_gene_count(&lib, &ids(&["P1", "P2"]), 4).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_disjoint_pathways_share_nothing() {
        let lib = FakeLibrary::default()
            .with_pathway("P1", &["g1", "g2"])
            .with_pathway("P2", &["g3"])
            .with_pathway("P3", &["g4", "g5"]);
        assert_eq!(
            common_gene_count(&lib, &ids(&["P1", "P2", "P3"]), 4).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_exactly_one_shared_gene() {
        let lib = FakeLibrary::default()
            .with_pathway("P1", &["g1", "g2"])
            .with_pathway("P2", &["g3", "g9"])
            .with_pathway("P3", &["g9", "g4"]);
        assert_eq!(
            common_gene_count(&lib, &ids(&["P1", "P2", "P3"]), 4).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_gene_in_three_pathways_counts_once() {
        let lib = FakeLibrary::default()
            .with_pathway("P1", &["g1"])
            .with_pathway("P2", &["g1"])
            .with_pathway("P3", &["g1"]);
        assert_eq!(
            common_gene_count(&lib, &ids(&["P1", "P2", "P3"]), 4).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn test_empty_and_single_sets_need_no_lookup() {
        let lib = FakeLibrary::default().with_pathway("P1", &["g1", "g1"]);
        assert_eq!(common_gene_count(&lib, &[], 4).await.unwrap(), 0);
        assert_eq!(common_gene_count(&lib, &ids(&["P1"]), 4).await.unwrap(), 0);
        assert_eq!(common_gene_count(&lib, &ids(&["P1", "P1"]), 4).await.unwrap(), 0);
        assert_eq!(lib.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_duplicate_within_one_pathway_counts_per_occurrence() {
        let lib = FakeLibrary::default()
            .with_pathway("P1", &["g1", "g1"])
            .with_pathway("P2", &["g2"]);
        assert_eq!(common_gene_count(&lib, &ids(&["P1", "P2"]), 4).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_pathway_fails_whole_request() {
        let lib = FakeLibrary::default().with_pathway("P1", &["g1"]);
        let err = common_gene_count(&lib, &ids(&["P1", "P404"]), 4).await.unwrap_err();
        assert!(matches!(err, GatewayError::ReferenceLookupFailed(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_pathway_frequency_scenario() {
        let lib = FakeLibrary::default()
            .with_gene("1", &["Pa", "Pb"])
            .with_gene("2", &["Pb"]);
        let freq = pathway_frequency(&lib, &ids(&["hsa:1", "hsa:2"]), 4).await.unwrap();
        assert_eq!(freq.len(), 2);
        assert_eq!(freq["Pa"], 1);
        assert_eq!(freq["Pb"], 2);
    }

    #[tokio::test]
    async fn test_pathway_frequency_sum_invariant() {
        let lib = FakeLibrary::default()
            .with_gene("1", &["Pa", "Pb", "Pc"])
            .with_gene("2", &["Pb"])
            .with_gene("3", &[])
            .with_gene("4", &["Pc", "Pb"]);
        let genes = ids(&["hsa:1", "hsa:2", "hsa:3", "hsa:4"]);
        let freq = pathway_frequency(&lib, &genes, 4).await.unwrap();

        for (pathway, count) in &freq {
            let expected = genes
                .iter()
                .filter(|g| lib.genes[strip_namespace(g).unwrap()].contains(pathway))
                .count();
            assert_eq!(*count, expected, "pathway {}", pathway);
            assert!(*count >= 1);
        }
        assert_eq!(freq["Pb"], 3);
    }

    #[tokio::test]
    async fn test_malformed_gene_rejected_before_lookup() {
        let lib = FakeLibrary::default().with_gene("1", &["Pa"]);
        let err = pathway_frequency(&lib, &ids(&["hsa:1", "7157"]), 4).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedIdentifier(ref id) if id == "7157"));
        assert_eq!(lib.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_gene_list() {
        let lib = FakeLibrary::default();
        assert!(pathway_frequency(&lib, &[], 4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gene_lookups_respect_concurrency_limit() {
        let mut lib = FakeLibrary::default().with_latency(Duration::from_millis(20));
        let mut genes = Vec::new();
        for n in 0..100 {
            lib = lib.with_gene(&n.to_string(), &["Pa"]);
            genes.push(format!("hsa:{}", n));
        }

        let freq = pathway_frequency(&lib, &genes, 4).await.unwrap();

        assert_eq!(freq["Pa"], 100);
        assert_eq!(lib.lookups.load(Ordering::SeqCst), 100);
        let peak = lib.peak_in_flight.load(Ordering::SeqCst);
        assert!(peak <= 4, "peak in flight was {}", peak);
        assert!(peak > 1, "lookups never overlapped");
    }

    #[tokio::test]
    async fn test_pathway_lookups_respect_concurrency_limit() {
        let mut lib = FakeLibrary::default().with_latency(Duration::from_millis(20));
        let mut pathways = Vec::new();
        for n in 0..20 {
            let id = format!("P{}", n);
            lib = lib.with_pathway(&id, &["g1"]);
            pathways.push(id);
        }

        assert_eq!(common_gene_count(&lib, &pathways, 2).await.unwrap(), 1);
        assert!(lib.peak_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn test_split_list_ignores_repeated_spaces() {
        assert_eq!(split_list(" hsa:1  hsa:2 "), vec!["hsa:1", "hsa:2"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_strip_namespace() {
        assert_eq!(strip_namespace("hsa:7157").unwrap(), "7157");
        assert!(strip_namespace("hsa:").is_err());
        assert!(strip_namespace("7157").is_err());
    }
}
