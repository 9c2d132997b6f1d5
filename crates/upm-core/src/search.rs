//! UniProtKB search
//!
//! Runs a query-language string against `/uniprotkb/search` and walks the
//! paginated hits with the same paginator and decoder as the mapping
//! engine. Unlike a mapping run there are no batches to degrade: any page
//! that cannot be fetched or decoded fails the search.

use crate::context::ApiContext;
use crate::decode::{Decoder, PayloadKind};
use crate::endpoints;
use crate::error::{MapperError, Result};
use crate::paginate::{Paginator, ResultPages};
use crate::types::Record;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Return fields; the registry's default set when empty
    pub fields: Vec<String>,
    pub include_isoform: bool,
    /// Stop after this many hits
    pub limit: Option<usize>,
}

impl SearchOptions {
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_isoforms(mut self, include: bool) -> Self {
        self.include_isoform = include;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchResult {
    /// One record per entry; `from_id` and `to_id` are both the accession
    pub records: Vec<Record>,
    /// Hit count reported by the service, which may exceed `records.len()`
    pub total_results: Option<u64>,
    /// Fields each record was decoded with
    pub fields: Vec<String>,
}

pub struct KbSearch {
    ctx: ApiContext,
}

impl KbSearch {
    pub fn new(ctx: ApiContext) -> Self {
        Self { ctx }
    }

    /// Fields a search with `options` will request
    pub fn resolve_fields(&self, options: &SearchOptions) -> Result<Vec<String>> {
        if options.fields.is_empty() {
            return Ok(self
                .ctx
                .registry
                .default_return_fields()
                .into_iter()
                .map(str::to_string)
                .collect());
        }
        self.ctx.registry.validate_return_fields(&options.fields)?;
        Ok(options.fields.clone())
    }

    /// Lazily paginated hits for `query`
    pub fn pages(
        &self,
        query: &str,
        options: &SearchOptions,
        cancel: CancellationToken,
    ) -> Result<ResultPages> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MapperError::invalid_input("search query is empty"));
        }
        let fields = self.resolve_fields(options)?;

        let mut request = Paginator::new(self.ctx.clone())
            .base_request(endpoints::kb_search_url(self.ctx.base_url()))
            .param("query", query)
            .param("fields", fields.join(","))
            .param("includeIsoform", options.include_isoform.to_string());
        if let Some(limit) = options.limit {
            let size = limit.clamp(1, self.ctx.config.page_size);
            request.params.retain(|(k, _)| k != "size");
            request = request.param("size", size.to_string());
        }

        let decoder = Decoder::new(
            PayloadKind::Search,
            self.ctx.config.format,
            fields,
            self.ctx.registry.clone(),
        );
        Ok(ResultPages::new(self.ctx.clone(), request, decoder, cancel))
    }

    pub async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchResult> {
        self.search_with_cancel(query, options, CancellationToken::new())
            .await
    }

    pub async fn search_with_cancel(
        &self,
        query: &str,
        options: &SearchOptions,
        cancel: CancellationToken,
    ) -> Result<SearchResult> {
        let fields = self.resolve_fields(options)?;
        let mut pages = self.pages(query, options, cancel)?;
        let mut result = SearchResult {
            fields,
            ..Default::default()
        };

        info!(query, limit = ?options.limit, "searching UniProtKB");
        while let Some(page) = pages.next_page().await {
            let page = page?;
            if result.total_results.is_none() {
                result.total_results = page.total_results;
            }
            result.records.extend(page.records);

            if let Some(limit) = options.limit {
                if result.records.len() >= limit {
                    result.records.truncate(limit);
                    break;
                }
            }
        }

        info!(
            hits = result.records.len(),
            total = ?result.total_results,
            "search finished"
        );
        Ok(result)
    }
}
