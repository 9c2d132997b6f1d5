//! Field extraction from UniProtKB JSON entries
//!
//! Return-field names do not match the JSON layout one to one, so the
//! common fields are resolved through explicit paths. Anything else falls
//! back to a top-level key with the same name.

use crate::types::FieldValue;
use serde_json::Value;

pub(super) fn extract(entry: &Value, field: &str) -> FieldValue {
    match field {
        "accession" => at(entry, "/primaryAccession"),
        "id" => at(entry, "/uniProtkbId"),
        "reviewed" => entry
            .get("entryType")
            .and_then(Value::as_str)
            .map(|t| {
                let reviewed = t.contains("Swiss-Prot") && !t.contains("unreviewed");
                FieldValue::Text(if reviewed { "reviewed" } else { "unreviewed" }.into())
            })
            .unwrap_or(FieldValue::Absent),
        "protein_name" => first_of(
            entry,
            &[
                "/proteinDescription/recommendedName/fullName/value",
                "/proteinDescription/submissionNames/0/fullName/value",
            ],
        ),
        "gene_names" => joined(gene_names(entry, true), " "),
        "gene_primary" => joined(gene_names(entry, false), "; "),
        "organism_name" => at(entry, "/organism/scientificName"),
        "organism_id" => at(entry, "/organism/taxonId"),
        "length" => at(entry, "/sequence/length"),
        "mass" => at(entry, "/sequence/molWeight"),
        "sequence" => at(entry, "/sequence/value"),
        "annotation_score" => at(entry, "/annotationScore"),
        "protein_existence" => at(entry, "/proteinExistence"),
        "version" => at(entry, "/entryAudit/entryVersion"),
        "date_created" => at(entry, "/entryAudit/firstPublicDate"),
        "date_modified" => at(entry, "/entryAudit/lastAnnotationUpdateDate"),
        "date_sequence_modified" => at(entry, "/entryAudit/lastSequenceUpdateDate"),
        "keyword" => joined(names_in(entry, "/keywords", "/name"), ";"),
        "keywordid" => joined(names_in(entry, "/keywords", "/id"), ";"),
        "ec" => joined(
            names_in(entry, "/proteinDescription/recommendedName/ecNumbers", "/value"),
            "; ",
        ),
        "go_id" => joined(xref_ids(entry, "GO"), "; "),
        "go" => joined(go_terms(entry, None), "; "),
        "go_p" => joined(go_terms(entry, Some('P')), "; "),
        "go_c" => joined(go_terms(entry, Some('C')), "; "),
        "go_f" => joined(go_terms(entry, Some('F')), "; "),
        "cc_subcellular_location" => joined(subcellular_locations(entry), "; "),
        name => match name.strip_prefix("xref_") {
            Some(db) if db != "proteomes" => joined(xref_ids(entry, db), ";"),
            _ => entry.get(name).map(value).unwrap_or(FieldValue::Absent),
        },
    }
}

fn value(v: &Value) -> FieldValue {
    match v {
        Value::Null => FieldValue::Absent,
        Value::String(s) => FieldValue::Text(s.clone()),
        other => FieldValue::Json(other.clone()),
    }
}

fn at(entry: &Value, pointer: &str) -> FieldValue {
    entry.pointer(pointer).map(value).unwrap_or(FieldValue::Absent)
}

fn first_of(entry: &Value, pointers: &[&str]) -> FieldValue {
    pointers
        .iter()
        .map(|p| at(entry, p))
        .find(|v| !v.is_absent())
        .unwrap_or(FieldValue::Absent)
}

fn joined(values: Vec<String>, sep: &str) -> FieldValue {
    if values.is_empty() {
        FieldValue::Absent
    } else {
        FieldValue::Text(values.join(sep))
    }
}

fn array<'v>(entry: &'v Value, pointer: &str) -> &'v [Value] {
    entry
        .pointer(pointer)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn names_in(entry: &Value, list: &str, item: &str) -> Vec<String> {
    array(entry, list)
        .iter()
        .filter_map(|v| v.pointer(item))
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

fn gene_names(entry: &Value, with_synonyms: bool) -> Vec<String> {
    let mut names = Vec::new();
    for gene in array(entry, "/genes") {
        if let Some(name) = gene.pointer("/geneName/value").and_then(Value::as_str) {
            names.push(name.to_string());
        }
        if with_synonyms {
            names.extend(names_in(gene, "/synonyms", "/value"));
            names.extend(names_in(gene, "/orderedLocusNames", "/value"));
            names.extend(names_in(gene, "/orfNames", "/value"));
        }
    }
    names
}

fn cross_references<'v>(entry: &'v Value, database: &'v str) -> impl Iterator<Item = &'v Value> {
    array(entry, "/uniProtKBCrossReferences").iter().filter(move |x| {
        x.get("database")
            .and_then(Value::as_str)
            .is_some_and(|d| d.eq_ignore_ascii_case(database))
    })
}

fn xref_ids(entry: &Value, database: &str) -> Vec<String> {
    cross_references(entry, database)
        .filter_map(|x| x.get("id").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

/// GO terms, optionally restricted to one aspect (`P`, `C` or `F`)
fn go_terms(entry: &Value, aspect: Option<char>) -> Vec<String> {
    cross_references(entry, "GO")
        .filter_map(|x| {
            let id = x.get("id").and_then(Value::as_str)?;
            let term = x
                .get("properties")
                .and_then(Value::as_array)?
                .iter()
                .find(|p| p.get("key").and_then(Value::as_str) == Some("GoTerm"))?
                .get("value")
                .and_then(Value::as_str)?;
            let (kind, name) = term.split_once(':')?;
            match aspect {
                Some(a) if !kind.starts_with(a) => None,
                _ => Some(format!("{} [{}]", name, id)),
            }
        })
        .collect()
}

fn subcellular_locations(entry: &Value) -> Vec<String> {
    array(entry, "/comments")
        .iter()
        .filter(|c| c.get("commentType").and_then(Value::as_str) == Some("SUBCELLULAR LOCATION"))
        .flat_map(|c| names_in(c, "/subcellularLocations", "/location/value"))
        .collect()
}
