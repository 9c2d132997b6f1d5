//! `upm orthologs` command implementation

use crate::commands::{cancel_on_ctrl_c, map::collect_identifiers};
use crate::error::Result;
use crate::output::{self, Columns, OutputFormat, ORTHODB_COLUMN};
use crate::progress;
use colored::Colorize;
use std::path::PathBuf;
use tracing::info;
use upm_core::{
    ApiContext, FieldValue, MapperConfig, OrthologFinder, OrthologRequest, OrthologResult, Record,
};

#[derive(Debug, Clone, Default)]
pub struct OrthologArgs {
    pub ids: Vec<String>,
    pub input: Option<PathBuf>,
    pub organisms: Vec<String>,
    pub case_sensitive: bool,
    pub fields: Vec<String>,
    pub batch_size: Option<usize>,
    pub output: Option<PathBuf>,
    pub overwrite: bool,
    pub format: Option<OutputFormat>,
}

/// Run the orthologs command
pub async fn run(args: OrthologArgs, config: MapperConfig, verbose: bool) -> Result<()> {
    let identifiers = collect_identifiers(&args.ids, args.input.as_deref())?;
    let batch_size = args.batch_size.unwrap_or(config.batch_size);

    let request = OrthologRequest::new(identifiers)
        .with_organisms(args.organisms.clone())
        .with_case_sensitive(args.case_sensitive)
        .with_fields(args.fields.clone())
        .with_batch_size(batch_size);
    info!(
        identifiers = request.identifiers.len(),
        organisms = ?request.organisms,
        "running orthologs command"
    );

    let finder = OrthologFinder::new(ApiContext::new(config)?);
    let spinner = progress::create_spinner("Looking up orthologs via OrthoDB...", verbose);
    let result = finder.run_with_cancel(request, cancel_on_ctrl_c()).await;
    spinner.finish_and_clear();
    let result = result?;

    let format = OutputFormat::resolve(args.format, args.output.is_some());
    let rendered = render(&result, format)?;
    output::emit(&rendered, args.output.as_deref(), args.overwrite)?;

    summarize(&result);
    Ok(())
}

/// One row per ortholog: query accession, group, Swiss-Prot entry
fn rows(result: &OrthologResult) -> Vec<Record> {
    result
        .orthologs
        .iter()
        .map(|o| {
            let mut row = Record::new(&o.original_id, &o.record.to_id);
            row.fields = o.record.fields.clone();
            row.fields.insert(
                ORTHODB_COLUMN.to_string(),
                FieldValue::Text(o.orthodb_id.clone()),
            );
            row
        })
        .collect()
}

fn render(result: &OrthologResult, format: OutputFormat) -> Result<String> {
    let columns = Columns::orthologs(&result.fields);
    match format {
        OutputFormat::Table => Ok(output::format_as_table(&columns, &rows(result))),
        OutputFormat::Tsv => Ok(output::format_as_tsv(&columns, &rows(result))),
        OutputFormat::Json => output::format_as_json(result),
    }
}

fn summarize(result: &OrthologResult) {
    let queried: std::collections::HashSet<&str> = result
        .orthologs
        .iter()
        .map(|o| o.original_id.as_str())
        .collect();
    eprintln!(
        "{} {} orthologs for {} identifiers",
        "✓".green(),
        result.orthologs.len(),
        queried.len()
    );
    if !result.unmapped.is_empty() {
        eprintln!("  {} no ortholog: {}", "✗".red(), result.unmapped.join(", "));
    }
    for error in &result.batch_errors {
        eprintln!("  {} batch {}: {}", "!".yellow(), error.batch_index + 1, error.message);
    }
    if result.cancelled {
        eprintln!("{}", "Run cancelled; results are incomplete.".yellow());
    } else if result.is_partial {
        eprintln!("{}", "Some batches did not complete; results are incomplete.".yellow());
    }
}
