//! `upm map` command implementation

use crate::commands::cancel_on_ctrl_c;
use crate::error::{CliError, Result};
use crate::output::{self, Columns, OutputFormat};
use crate::progress;
use colored::Colorize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use upm_core::endpoints::ResultCollection;
use upm_core::{
    ApiContext, FieldRegistry, MapperConfig, MappingOrchestrator, MappingRequest, MappingResult,
    StaticRegistry,
};

#[derive(Debug, Clone, Default)]
pub struct MapArgs {
    pub from: String,
    pub to: String,
    pub ids: Vec<String>,
    pub input: Option<PathBuf>,
    pub fields: Vec<String>,
    pub batch_size: Option<usize>,
    pub concurrency: Option<usize>,
    pub output: Option<PathBuf>,
    pub overwrite: bool,
    pub format: Option<OutputFormat>,
}

/// Run the map command
pub async fn run(args: MapArgs, config: MapperConfig, verbose: bool) -> Result<()> {
    let identifiers = collect_identifiers(&args.ids, args.input.as_deref())?;
    check_databases(&args.from, &args.to)?;

    let mut config = config;
    if let Some(concurrency) = args.concurrency {
        config = config.with_concurrency(concurrency);
    }
    let batch_size = args.batch_size.unwrap_or(config.batch_size);
    let fields = if ResultCollection::for_target(&args.to).accepts_fields() {
        args.fields.clone()
    } else {
        if !args.fields.is_empty() {
            eprintln!(
                "{} --fields ignored: results for '{}' carry no UniProtKB fields",
                "!".yellow(),
                args.to
            );
        }
        Vec::new()
    };

    let request = MappingRequest::new(&args.from, &args.to, identifiers)
        .with_batch_size(batch_size)
        .with_fields(fields.clone());
    info!(
        from = %args.from,
        to = %args.to,
        identifiers = request.identifiers.len(),
        batch_size,
        "running map command"
    );

    let batches = request.identifiers.len().div_ceil(batch_size.max(1));
    let pb = progress::create_batch_progress(batches, verbose);
    let observer = pb.clone();

    let orchestrator = MappingOrchestrator::new(ApiContext::new(config)?)
        .on_progress(move |p| progress::record(&observer, p));
    let result = orchestrator
        .run_with_cancel(request, cancel_on_ctrl_c())
        .await;
    pb.finish_and_clear();
    let result = result?;

    let format = OutputFormat::resolve(args.format, args.output.is_some());
    let columns = Columns::mapping(&fields);
    let rendered = match format {
        OutputFormat::Table => output::format_as_table(&columns, &result.results),
        OutputFormat::Tsv => output::format_as_tsv(&columns, &result.results),
        OutputFormat::Json => output::format_as_json(&result)?,
    };
    output::emit(&rendered, args.output.as_deref(), args.overwrite)?;

    summarize(&result);
    Ok(())
}

/// Identifiers from arguments and `--input`, trimmed and de-duplicated
pub(crate) fn collect_identifiers(args: &[String], input: Option<&Path>) -> Result<Vec<String>> {
    let mut raw: Vec<String> = args.to_vec();
    if let Some(path) = input {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        raw.extend(contents.lines().map(str::to_string));
    }

    let mut seen = HashSet::new();
    let identifiers: Vec<String> = raw
        .iter()
        .flat_map(|chunk| chunk.split([',', ' ', '\t']))
        .map(str::trim)
        .filter(|id| !id.is_empty() && !id.starts_with('#'))
        .filter(|id| seen.insert(id.to_string()))
        .map(str::to_string)
        .collect();

    if identifiers.is_empty() {
        return Err(CliError::NoIdentifiers);
    }
    debug!(count = identifiers.len(), "identifiers collected");
    Ok(identifiers)
}

fn check_databases(from: &str, to: &str) -> Result<()> {
    let registry = StaticRegistry;
    for db in [from, to] {
        if !registry.is_supported_database(db) {
            return Err(CliError::UnsupportedDatabase(db.to_string()));
        }
    }
    Ok(())
}

/// Failure and partial-result summary on stderr
fn summarize(result: &MappingResult) {
    let mut by_reason: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for failed in &result.failed_ids {
        by_reason
            .entry(failed.reason.to_string())
            .or_default()
            .push(&failed.from_id);
    }

    eprintln!(
        "{} {} mapped, {} failed",
        "✓".green(),
        result.mapped_ids().len(),
        result.failed_ids.len()
    );
    for (reason, ids) in &by_reason {
        let shown: Vec<&str> = ids.iter().take(10).copied().collect();
        let more = if ids.len() > shown.len() {
            format!(" (+{} more)", ids.len() - shown.len())
        } else {
            String::new()
        };
        eprintln!("  {} {}: {}{}", "✗".red(), reason, shown.join(", "), more);
    }

    for error in &result.batch_errors {
        eprintln!("  {} batch {}: {}", "!".yellow(), error.batch_index + 1, error.message);
    }
    if result.cancelled {
        eprintln!("{}", "Run cancelled; results are incomplete.".yellow());
    } else if result.is_partial {
        eprintln!(
            "{}",
            "Some batches did not complete; their identifiers are marked UNKNOWN.".yellow()
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_identifiers_merges_and_dedups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ids.txt");
        std::fs::write(&path, "# header\nP30542\nQ16678, P12345\n\nP30542\n").unwrap();

        let ids = collect_identifiers(&["P99999".into()], Some(&path)).unwrap();
        assert_eq!(ids, vec!["P99999", "P30542", "Q16678", "P12345"]);
    }

    #[test]
    fn test_collect_identifiers_errors() {
        assert!(matches!(
            collect_identifiers(&[" , ".into()], None),
            Err(CliError::NoIdentifiers)
        ));
        assert!(matches!(
            collect_identifiers(&[], Some(Path::new("/no/such/ids.txt"))),
            Err(CliError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_check_databases() {
        assert!(check_databases("UniProtKB_AC-ID", "Ensembl").is_ok());
        assert!(matches!(
            check_databases("UniProtKB_AC-ID", "Nowhere"),
            Err(CliError::UnsupportedDatabase(db)) if db == "Nowhere"
        ));
    }
}
