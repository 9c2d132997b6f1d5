//! Build automation tasks for UPM
//!
//! - `generate-cli-docs`: write the `upm` command reference as markdown
//! - `check-cli-docs`: fail if the committed reference is out of date

use anyhow::{bail, Context};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation tasks for UPM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Generate the CLI reference
    GenerateCliDocs {
        /// Output file for the generated reference
        #[arg(short, long, default_value = "docs/cli-reference.md")]
        output: PathBuf,
    },

    /// Compare the committed CLI reference against the current CLI
    CheckCliDocs {
        #[arg(short, long, default_value = "docs/cli-reference.md")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::GenerateCliDocs { output } => generate_cli_docs(&output)?,
        Command::CheckCliDocs { output } => check_cli_docs(&output)?,
    }

    Ok(())
}

fn render() -> String {
    let commands = clap_markdown::help_markdown::<upm_cli::Cli>();

    format!(
        r#"# UPM CLI Reference

`upm` maps identifiers between databases through the UniProt ID-mapping
service and searches UniProtKB.

## Quick Start

```bash
# Map two accessions to Ensembl gene ids
upm map -f UniProtKB_AC-ID -t Ensembl P30542 Q16678

# Map a file of accessions, 100 per job, three jobs at a time
upm map -f UniProtKB_AC-ID -t UniProtKB --input ids.txt \
  --batch-size 100 --concurrency 3 --fields accession,gene_names -o mapped.tsv

# Reviewed human entries of a given length, as a query string only
upm search --filter reviewed=true --filter organism_id=9606 \
  --filter length=100..200 --dry-run

# Human and mouse Swiss-Prot orthologs through OrthoDB
upm orthologs P30542 --organism "Homo sapiens" --organism "Mus musculus"

# What can be queried or returned
upm fields --category "Gene Ontology (GO)"
upm databases
```

## Commands

{}

## Environment Variables

- `UPM_API_URL` - REST API base URL (default: `https://rest.uniprot.org`)
- `UPM_POLL_INTERVAL_SECS`, `UPM_MAX_WAIT_SECS` - job polling cadence and deadline
- `UPM_BATCH_SIZE`, `UPM_CONCURRENCY` - identifiers per job, jobs in flight
- `UPM_PAGE_SIZE`, `UPM_FORMAT`, `UPM_COMPRESSED` - result page options
- `UPM_REQUEST_TIMEOUT_SECS` - per-request HTTP timeout
- `LOG_LEVEL`, `LOG_OUTPUT`, `LOG_FORMAT`, `LOG_DIR` - logging

---

*Generated from the CLI source. To update, run `cargo xtask generate-cli-docs`.*
"#,
        commands
    )
}

fn generate_cli_docs(output: &Path) -> anyhow::Result<()> {
    println!("Generating CLI documentation...");

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, render())
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("✅ Generated CLI documentation at: {}", output.display());
    Ok(())
}

fn check_cli_docs(output: &Path) -> anyhow::Result<()> {
    let committed = fs::read_to_string(output)
        .with_context(|| format!("Failed to read {}", output.display()))?;
    if committed != render() {
        bail!(
            "{} is out of date. Run `cargo xtask generate-cli-docs`.",
            output.display()
        );
    }
    println!("✅ CLI documentation is up to date");
    Ok(())
}
