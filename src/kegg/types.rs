//! Reference library entities.
//!
//! Field names serialize in the casing the front-end reads (`Id`, `Name`,
//! `DBLinks`, `Drug_Target`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::kegg::flatfile::{first_token, split_id_label, FlatEntry};
use crate::kegg::ReferenceError;

/// A pathway and its member genes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pathway {
    pub id: String,
    pub name: String,
    pub description: String,
    pub class: String,
    /// Namespaced gene IDs (`hsa:595`), in entry order.
    pub genes: Vec<String>,
    pub compounds: Vec<String>,
}

impl Pathway {
    pub fn from_entry(entry: &FlatEntry) -> Result<Self, ReferenceError> {
        let id = entry_id(entry)?;
        let organism = id.trim_end_matches(|c: char| c.is_ascii_digit());

        let genes = entry
            .values("GENE")
            .map(first_token)
            .filter(|gene| !gene.is_empty())
            .map(|gene| format!("{}:{}", organism, gene))
            .collect();

        let compounds = entry
            .values("COMPOUND")
            .map(first_token)
            .map(str::to_string)
            .collect();

        Ok(Self {
            name: entry.first("NAME").unwrap_or_default().to_string(),
            description: entry.joined("DESCRIPTION", " "),
            class: entry.first("CLASS").unwrap_or_default().to_string(),
            id,
            genes,
            compounds,
        })
    }

    /// Pathway name with the trailing ` - Species (common name)` removed.
    pub fn readable_name(&self) -> &str {
        match self.name.rsplit_once(" - ") {
            Some((name, organism)) if organism.ends_with(')') => name,
            _ => &self.name,
        }
    }
}

/// A gene entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Gene {
    /// Un-prefixed identifier (`7157`).
    pub id: String,
    /// Comma-separated symbols, official symbol first.
    pub name: String,
    pub definition: String,
    pub orthology: String,
    pub organism: String,
    /// Pathway IDs the gene participates in.
    pub pathways: Vec<String>,
    pub diseases: Vec<String>,
    pub modules: Vec<String>,
    #[serde(rename = "Drug_Target")]
    pub drug_target: Vec<String>,
    pub classes: Vec<String>,
    pub position: String,
    pub motif: String,
    #[serde(rename = "DBLinks")]
    pub db_links: BTreeMap<String, String>,
    pub structure: String,
}

impl Gene {
    pub fn from_entry(entry: &FlatEntry) -> Result<Self, ReferenceError> {
        let id = entry_id(entry)?;

        // Newer entries carry symbols under SYMBOL and the description under NAME.
        let (name, definition) = if entry.has("SYMBOL") {
            let definition = entry.joined("NAME", " ");
            let definition = definition
                .strip_prefix("(RefSeq) ")
                .map(str::to_string)
                .unwrap_or(definition);
            (entry.joined("SYMBOL", " "), definition)
        } else {
            (entry.joined("NAME", " "), entry.joined("DEFINITION", " "))
        };

        let db_links = entry
            .values("DBLINKS")
            .filter_map(|line| line.split_once(':'))
            .map(|(db, ids)| (db.trim().to_string(), ids.trim().to_string()))
            .collect();

        Ok(Self {
            id,
            name,
            definition,
            orthology: entry.first("ORTHOLOGY").unwrap_or_default().to_string(),
            organism: entry.first("ORGANISM").unwrap_or_default().to_string(),
            pathways: ids_of(entry, "PATHWAY"),
            diseases: lines_of(entry, "DISEASE"),
            modules: lines_of(entry, "MODULE"),
            drug_target: lines_of(entry, "DRUG_TARGET"),
            classes: lines_of(entry, "CLASS"),
            position: entry.first("POSITION").unwrap_or_default().to_string(),
            motif: entry.joined("MOTIF", " "),
            db_links,
            structure: entry.joined("STRUCTURE", " "),
        })
    }
}

/// A compound entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Compound {
    pub id: String,
    pub name: String,
    pub formula: String,
    pub exact_mass: String,
    pub mol_weight: String,
    pub pathways: Vec<String>,
}

impl Compound {
    pub fn from_entry(entry: &FlatEntry) -> Result<Self, ReferenceError> {
        Ok(Self {
            id: entry_id(entry)?,
            name: entry
                .values("NAME")
                .map(|name| name.trim_end_matches(';'))
                .collect::<Vec<_>>()
                .join("; "),
            formula: entry.first("FORMULA").unwrap_or_default().to_string(),
            exact_mass: entry.first("EXACT_MASS").unwrap_or_default().to_string(),
            mol_weight: entry.first("MOL_WEIGHT").unwrap_or_default().to_string(),
            pathways: ids_of(entry, "PATHWAY"),
        })
    }
}

/// Body of `/info/gene/{gene}/pathways`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayList {
    #[serde(rename = "Pathways")]
    pub pathways: Vec<String>,
}

fn entry_id(entry: &FlatEntry) -> Result<String, ReferenceError> {
    match entry.id() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ReferenceError::Parse {
            id: String::new(),
            reason: "ENTRY line has no identifier".to_string(),
        }),
    }
}

fn ids_of(entry: &FlatEntry, key: &str) -> Vec<String> {
    entry
        .values(key)
        .map(|line| split_id_label(line).0.to_string())
        .collect()
}

fn lines_of(entry: &FlatEntry, key: &str) -> Vec<String> {
    entry.values(key).map(str::to_string).collect()
}
