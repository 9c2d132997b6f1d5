//! `upm search` command implementation

use crate::commands::cancel_on_ctrl_c;
use crate::error::Result;
use crate::filter;
use crate::output::{self, Columns, OutputFormat};
use crate::progress;
use std::path::PathBuf;
use tracing::info;
use upm_core::{ApiContext, KbSearch, MapperConfig, SearchOptions, SearchResult};

#[derive(Debug, Clone, Default)]
pub struct SearchArgs {
    pub query: Option<String>,
    pub filters: Vec<String>,
    pub any: bool,
    pub fields: Vec<String>,
    pub limit: Option<usize>,
    pub isoforms: bool,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub overwrite: bool,
    pub dry_run: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs, config: MapperConfig, verbose: bool) -> Result<()> {
    let query = filter::build_query(args.query.as_deref(), &args.filters, args.any)?;

    if args.dry_run {
        println!("{}", query);
        return Ok(());
    }

    let mut options = SearchOptions::default()
        .with_fields(args.fields.clone())
        .with_isoforms(args.isoforms);
    if let Some(limit) = args.limit {
        options = options.with_limit(limit);
    }
    info!(query = %query, "running search command");

    let search = KbSearch::new(ApiContext::new(config)?);
    let spinner = progress::create_spinner("Searching UniProtKB...", verbose);
    let result = search
        .search_with_cancel(&query, &options, cancel_on_ctrl_c())
        .await;
    spinner.finish_and_clear();
    let result = result?;

    let format = OutputFormat::resolve(args.format, args.output.is_some());
    let rendered = render(&query, &result, format)?;
    output::emit(&rendered, args.output.as_deref(), args.overwrite)?;

    match result.total_results {
        Some(total) => eprintln!("Showing {} of {} results", result.records.len(), total),
        None => eprintln!("Showing {} results", result.records.len()),
    }
    Ok(())
}

fn render(query: &str, result: &SearchResult, format: OutputFormat) -> Result<String> {
    let columns = Columns::search(&result.fields);
    match format {
        OutputFormat::Table => Ok(output::format_as_table(&columns, &result.records)),
        OutputFormat::Tsv => Ok(output::format_as_tsv(&columns, &result.records)),
        OutputFormat::Json => output::format_as_json(&serde_json::json!({
            "query": query,
            "total_results": result.total_results,
            "results": result.records,
        })),
    }
}
