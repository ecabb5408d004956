//! `/info/...` and `/geneid/...` handlers backed by the reference library.

use axum::{response::IntoResponse, response::Response, Json};

use crate::aggregate::{self, strip_namespace};
use crate::error::{GatewayError, GatewayResult};
use crate::http::handlers::{first_param, list_param};
use crate::http::response;
use crate::http::server::AppState;
use crate::kegg::PathwayList;
use crate::routing::RouteMatch;

/// Number of genes shared by the listed pathways, as plain text.
pub async fn common_genes(state: &AppState, route: &RouteMatch) -> GatewayResult<Response> {
    let pathways = list_param(route, "pathways");
    let count = aggregate::common_gene_count(
        state.reference.as_ref(),
        &pathways,
        state.lookup_concurrency,
    )
    .await?;
    Ok(response::text(count.to_string()))
}

/// Pathway → number of listed genes in it, as a JSON object.
pub async fn common_pathways(state: &AppState, route: &RouteMatch) -> GatewayResult<Response> {
    let genes = list_param(route, "genes");
    let frequency = aggregate::pathway_frequency(
        state.reference.as_ref(),
        &genes,
        state.lookup_concurrency,
    )
    .await?;
    Ok(Json(frequency).into_response())
}

/// Pathways of the first listed gene.
pub async fn gene_pathways(state: &AppState, route: &RouteMatch) -> GatewayResult<Response> {
    let gene_id = first_param(route, "gene")?;
    let gene = state.reference.get_gene(strip_namespace(&gene_id)?).await?;
    let list = PathwayList {
        pathways: state.reference.pathways(&gene),
    };
    Ok(Json(list).into_response())
}

/// Readable name of a pathway.
pub async fn pathway_name(state: &AppState, route: &RouteMatch) -> GatewayResult<Response> {
    let id = first_param(route, "id")?;
    let name = state.reference.pathway_name(&id).await?;
    Ok(response::text(name))
}

/// Gene ID for a gene symbol.
pub async fn gene_id_from_name(state: &AppState, route: &RouteMatch) -> GatewayResult<Response> {
    let name = first_param(route, "name")?;
    let gene_id = state.reference.gene_id_from_name(&name).await?;
    tracing::debug!(name = %name, gene_id = %gene_id, "Resolved gene name");
    Ok(response::text(gene_id))
}

/// Entity details. The kind is inferred from the first item:
/// `org:` → gene, `org` → pathway, `cpd` → compound, otherwise the items are echoed.
pub async fn info(state: &AppState, route: &RouteMatch) -> GatewayResult<Response> {
    let items = route.decoded("items").unwrap_or_default();
    let organism = state.reference.organism();

    if items.contains(&format!("{}:", organism)) {
        let gene_id = first_param(route, "items")?;
        let gene = state.reference.get_gene(strip_namespace(&gene_id)?).await?;
        return Ok(Json(gene).into_response());
    }

    if items.contains(organism) {
        let pathway_id = first_param(route, "items")?;
        let pathway = state.reference.get_pathway(&pathway_id).await?;
        return Ok(Json(pathway).into_response());
    }

    if items.contains("cpd") {
        let compound_id = first_param(route, "items")?;
        let Some(id) = compound_id
            .split_once(':')
            .map(|(_, id)| id.to_string())
            .filter(|id| !id.is_empty())
        else {
            return Err(GatewayError::MalformedIdentifier(compound_id));
        };
        let compound = state.reference.get_compound(&id).await?;
        return Ok(Json(compound).into_response());
    }

    Ok(response::text(items))
}
