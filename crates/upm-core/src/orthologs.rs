//! Ortholog lookup
//!
//! Two chained mapping runs: UniProtKB accessions to OrthoDB groups, then
//! OrthoDB groups back to reviewed UniProtKB entries. Each hit remembers
//! the accession it was found from, hits can be narrowed to organisms by
//! name, and accessions that end up with no ortholog are reported.

use crate::context::ApiContext;
use crate::error::{MapperError, Result};
use crate::orchestrator::MappingOrchestrator;
use crate::types::{BatchError, MappingRequest, Record, DEFAULT_BATCH_SIZE};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub const ACCESSION_DATABASE: &str = "UniProtKB_AC-ID";
pub const ORTHODB: &str = "OrthoDB";
pub const SWISS_PROT: &str = "UniProtKB-Swiss-Prot";

const ORGANISM_FIELD: &str = "organism_name";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrthologRequest {
    pub identifiers: Vec<String>,
    /// Organism name patterns (regular expressions); empty keeps every hit
    #[serde(default)]
    pub organisms: Vec<String>,
    #[serde(default)]
    pub case_sensitive: bool,
    /// Return fields for the Swiss-Prot entries; registry defaults when empty
    #[serde(default)]
    pub fields: Vec<String>,
    pub batch_size: usize,
}

impl OrthologRequest {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
            organisms: Vec::new(),
            case_sensitive: false,
            fields: Vec::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_organisms<I, S>(mut self, organisms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.organisms = organisms.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// One pattern matching any of `organisms`, or `None` when unfiltered
    fn organism_filter(&self) -> Result<Option<Regex>> {
        if self.organisms.is_empty() {
            return Ok(None);
        }
        let pattern = self.organisms.join("|");
        RegexBuilder::new(&pattern)
            .case_insensitive(!self.case_sensitive)
            .build()
            .map(Some)
            .map_err(|e| {
                MapperError::invalid_input(format!("invalid organism pattern '{}': {}", pattern, e))
            })
    }
}

/// A Swiss-Prot entry reached through an OrthoDB group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ortholog {
    /// Accession the lookup started from
    pub original_id: String,
    pub orthodb_id: String,
    /// `from_id` is the OrthoDB group, `to_id` the Swiss-Prot accession
    pub record: Record,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OrthologResult {
    pub orthologs: Vec<Ortholog>,
    /// Input accessions with no ortholog left after filtering
    pub unmapped: Vec<String>,
    pub fields: Vec<String>,
    pub is_partial: bool,
    pub cancelled: bool,
    pub batch_errors: Vec<BatchError>,
}

pub struct OrthologFinder {
    ctx: ApiContext,
}

impl OrthologFinder {
    pub fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    pub async fn run(&self, request: OrthologRequest) -> Result<OrthologResult> {
        self.run_with_cancel(request, CancellationToken::new()).await
    }

    pub async fn run_with_cancel(
        &self,
        request: OrthologRequest,
        cancel: CancellationToken,
    ) -> Result<OrthologResult> {
        let filter = request.organism_filter()?;
        let fields = self.resolve_fields(&request, filter.is_some())?;
        let orchestrator = MappingOrchestrator::new(self.ctx.clone());

        let to_groups =
            MappingRequest::new(ACCESSION_DATABASE, ORTHODB, request.identifiers.clone())
                .with_batch_size(request.batch_size);
        let groups = orchestrator.run_with_cancel(to_groups, cancel.clone()).await?;

        let mut result = OrthologResult {
            fields: fields.clone(),
            is_partial: groups.is_partial,
            cancelled: groups.cancelled,
            batch_errors: stage_errors(ORTHODB, groups.batch_errors),
            ..Default::default()
        };

        let mut originals: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut group_ids = Vec::new();
        for record in &groups.results {
            let sources = originals.entry(record.to_id.as_str()).or_default();
            if sources.is_empty() {
                group_ids.push(record.to_id.clone());
            }
            if !sources.contains(&record.from_id.as_str()) {
                sources.push(record.from_id.as_str());
            }
        }

        if !group_ids.is_empty() && !result.cancelled {
            let to_entries = MappingRequest::new(ORTHODB, SWISS_PROT, group_ids)
                .with_batch_size(request.batch_size)
                .with_fields(fields);
            let entries = orchestrator.run_with_cancel(to_entries, cancel).await?;

            result.is_partial |= entries.is_partial;
            result.cancelled |= entries.cancelled;
            result
                .batch_errors
                .extend(stage_errors(SWISS_PROT, entries.batch_errors));

            for record in entries.results {
                if let Some(re) = &filter {
                    let organism = record.field(ORGANISM_FIELD).and_then(|v| v.as_text());
                    if !organism.is_some_and(|name| re.is_match(name)) {
                        continue;
                    }
                }
                for original in originals.get(record.from_id.as_str()).into_iter().flatten() {
                    result.orthologs.push(Ortholog {
                        original_id: original.to_string(),
                        orthodb_id: record.from_id.clone(),
                        record: record.clone(),
                    });
                }
            }
        }

        let found: HashSet<&str> = result
            .orthologs
            .iter()
            .map(|o| o.original_id.as_str())
            .collect();
        let mut seen = HashSet::new();
        result.unmapped = request
            .identifiers
            .iter()
            .filter(|id| !found.contains(id.as_str()) && seen.insert(id.as_str()))
            .cloned()
            .collect();

        info!(
            identifiers = request.identifiers.len(),
            groups = originals.len(),
            orthologs = result.orthologs.len(),
            unmapped = result.unmapped.len(),
            partial = result.is_partial,
            "ortholog lookup finished"
        );
        Ok(result)
    }

    /// Requested fields, plus the organism name when filtering on it
    fn resolve_fields(&self, request: &OrthologRequest, filtering: bool) -> Result<Vec<String>> {
        let mut fields: Vec<String> = if request.fields.is_empty() {
            self.ctx
                .registry
                .default_return_fields()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            self.ctx.registry.validate_return_fields(&request.fields)?;
            request.fields.clone()
        };
        if filtering && !fields.iter().any(|f| f == ORGANISM_FIELD) {
            fields.push(ORGANISM_FIELD.to_string());
        }
        Ok(fields)
    }
}

fn stage_errors(stage: &str, errors: Vec<BatchError>) -> Vec<BatchError> {
    errors
        .into_iter()
        .map(|e| BatchError {
            batch_index: e.batch_index,
            message: format!("{}: {}", stage, e.message),
        })
        .collect()
}
