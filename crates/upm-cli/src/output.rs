//! Rendering of records for the terminal or a file

use crate::error::{CliError, Result};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use serde::Serialize;
use std::io::{self, IsTerminal};
use std::path::Path;
use upm_core::Record;

/// Record field carrying the OrthoDB group in ortholog rows
pub const ORTHODB_COLUMN: &str = "orthodb_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Tsv,
    Json,
}

impl OutputFormat {
    /// Explicit choice, else table for a TTY and tsv for pipes and files
    pub fn resolve(format: Option<OutputFormat>, to_file: bool) -> OutputFormat {
        match format {
            Some(f) => f,
            None if !to_file && io::stdout().is_terminal() => OutputFormat::Table,
            None => OutputFormat::Tsv,
        }
    }
}

/// Column layout for a set of records
pub struct Columns<'a> {
    pub headers: Vec<&'a str>,
    /// Leading identifier columns before the requested fields
    ids: IdColumns,
    fields: &'a [String],
}

enum IdColumns {
    FromTo,
    Entry,
    Ortholog,
}

impl<'a> Columns<'a> {
    /// `From`, `To`, then one column per field
    pub fn mapping(fields: &'a [String]) -> Self {
        let mut headers = vec!["From", "To"];
        headers.extend(fields.iter().map(String::as_str));
        Self {
            headers,
            ids: IdColumns::FromTo,
            fields,
        }
    }

    /// `Entry`, then one column per field
    pub fn search(fields: &'a [String]) -> Self {
        let mut headers = vec!["Entry"];
        headers.extend(fields.iter().map(String::as_str));
        Self {
            headers,
            ids: IdColumns::Entry,
            fields,
        }
    }

    /// `Query`, `OrthoDB`, `Ortholog`, then one column per field
    pub fn orthologs(fields: &'a [String]) -> Self {
        let mut headers = vec!["Query", "OrthoDB", "Ortholog"];
        headers.extend(fields.iter().map(String::as_str));
        Self {
            headers,
            ids: IdColumns::Ortholog,
            fields,
        }
    }

    fn row(&self, record: &Record, absent: &str) -> Vec<String> {
        let mut row = match self.ids {
            IdColumns::FromTo => vec![record.from_id.clone(), record.to_id.clone()],
            IdColumns::Entry => vec![record.to_id.clone()],
            IdColumns::Ortholog => vec![
                record.from_id.clone(),
                record
                    .field(ORTHODB_COLUMN)
                    .map(ToString::to_string)
                    .unwrap_or_else(|| absent.to_string()),
                record.to_id.clone(),
            ],
        };
        for field in self.fields {
            row.push(match record.field(field) {
                Some(value) if !value.is_absent() => value.to_string(),
                _ => absent.to_string(),
            });
        }
        row
    }
}

pub fn format_as_table(columns: &Columns<'_>, records: &[Record]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(&columns.headers);

    for record in records {
        table.add_row(
            columns
                .row(record, "-")
                .into_iter()
                .map(|cell| truncate_string(&cell, 60))
                .collect::<Vec<_>>(),
        );
    }

    format!("{}\n", table)
}

pub fn format_as_tsv(columns: &Columns<'_>, records: &[Record]) -> String {
    let mut output = String::new();
    output.push_str(&columns.headers.join("\t"));
    output.push('\n');

    for record in records {
        let cells: Vec<String> = columns
            .row(record, "")
            .into_iter()
            .map(|cell| cell.replace(['\t', '\n'], " "))
            .collect();
        output.push_str(&cells.join("\t"));
        output.push('\n');
    }
    output
}

pub fn format_as_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

/// Write `content` to `output`, or stdout when `None`
pub fn emit(content: &str, output: Option<&Path>, overwrite: bool) -> Result<()> {
    match output {
        Some(path) => {
            if path.exists() && !overwrite {
                return Err(CliError::OutputExists(path.display().to_string()));
            }
            std::fs::write(path, content)?;
            eprintln!(
                "{} Output written to: {}",
                "✓".green(),
                path.display().to_string().cyan()
            );
        }
        None => print!("{}", content),
    }
    Ok(())
}

/// Truncate a string to a maximum number of characters with ellipsis
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
