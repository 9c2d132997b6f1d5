//! UniProtKB XML entries
//!
//! XML pages carry full `<entry>` documents without the mapping source, so
//! only search hits are decoded from XML; the first accession of each entry
//! stands in for both ends of the record.

use crate::error::{MapperError, Result};
use crate::types::{DecodedPage, FieldValue, Record};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct UniProtXml {
    #[serde(rename = "entry", default)]
    entries: Vec<XmlEntry>,
}

#[derive(Debug, Deserialize)]
struct XmlEntry {
    #[serde(rename = "@dataset", default)]
    dataset: Option<String>,
    #[serde(rename = "@created", default)]
    created: Option<String>,
    #[serde(rename = "@modified", default)]
    modified: Option<String>,
    #[serde(rename = "@version", default)]
    version: Option<String>,
    #[serde(rename = "accession", default)]
    accessions: Vec<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    protein: Option<XmlProtein>,
    #[serde(rename = "gene", default)]
    genes: Vec<XmlGene>,
    #[serde(default)]
    organism: Option<XmlOrganism>,
    #[serde(rename = "dbReference", default)]
    db_references: Vec<XmlDbReference>,
    #[serde(rename = "keyword", default)]
    keywords: Vec<XmlText>,
    #[serde(default)]
    sequence: Option<XmlSequence>,
}

#[derive(Debug, Deserialize)]
struct XmlProtein {
    #[serde(rename = "recommendedName", default)]
    recommended_name: Option<XmlProteinName>,
    #[serde(rename = "submittedName", default)]
    submitted_names: Vec<XmlProteinName>,
}

#[derive(Debug, Deserialize)]
struct XmlProteinName {
    #[serde(rename = "fullName")]
    full_name: XmlText,
}

#[derive(Debug, Deserialize)]
struct XmlText {
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct XmlTypedName {
    #[serde(rename = "@type", default)]
    kind: String,
    #[serde(rename = "$text", default)]
    value: String,
}

#[derive(Debug, Deserialize)]
struct XmlGene {
    #[serde(rename = "name", default)]
    names: Vec<XmlTypedName>,
}

#[derive(Debug, Deserialize)]
struct XmlOrganism {
    #[serde(rename = "name", default)]
    names: Vec<XmlTypedName>,
    #[serde(rename = "dbReference", default)]
    db_references: Vec<XmlDbReference>,
}

#[derive(Debug, Deserialize)]
struct XmlDbReference {
    #[serde(rename = "@type")]
    kind: String,
    #[serde(rename = "@id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct XmlSequence {
    #[serde(rename = "@length", default)]
    length: Option<String>,
    #[serde(rename = "@mass", default)]
    mass: Option<String>,
    #[serde(rename = "$text", default)]
    value: String,
}

pub(super) fn decode(text: &str, fields: &[String], page_index: usize) -> Result<DecodedPage> {
    let doc: UniProtXml = quick_xml::de::from_str(text)
        .map_err(|e| MapperError::decode(page_index, format!("invalid XML payload: {}", e)))?;

    let mut page = DecodedPage::default();
    for (row, entry) in doc.entries.iter().enumerate() {
        let accession = entry.accessions.first().ok_or_else(|| {
            MapperError::decode(page_index, format!("entry {} has no accession", row))
        })?;
        page.records.push(Record {
            from_id: accession.clone(),
            to_id: accession.clone(),
            fields: fields
                .iter()
                .map(|f| (f.clone(), extract(entry, f)))
                .collect(),
        });
    }
    Ok(page)
}

fn text(value: Option<&str>) -> FieldValue {
    match value {
        Some(v) if !v.is_empty() => FieldValue::Text(v.to_string()),
        _ => FieldValue::Absent,
    }
}

fn joined<'a>(values: impl Iterator<Item = &'a str>, sep: &str) -> FieldValue {
    let values: Vec<&str> = values.filter(|v| !v.is_empty()).collect();
    if values.is_empty() {
        FieldValue::Absent
    } else {
        FieldValue::Text(values.join(sep))
    }
}

fn extract(entry: &XmlEntry, field: &str) -> FieldValue {
    match field {
        "accession" => text(entry.accessions.first().map(String::as_str)),
        "id" => text(entry.name.as_deref()),
        "reviewed" => match entry.dataset.as_deref() {
            Some("Swiss-Prot") => FieldValue::Text("reviewed".into()),
            Some(_) => FieldValue::Text("unreviewed".into()),
            None => FieldValue::Absent,
        },
        "protein_name" => {
            let protein = entry.protein.as_ref();
            let name = protein
                .and_then(|p| p.recommended_name.as_ref())
                .or_else(|| protein.and_then(|p| p.submitted_names.first()));
            text(name.map(|n| n.full_name.value.as_str()))
        }
        "gene_names" => joined(
            entry
                .genes
                .iter()
                .flat_map(|g| g.names.iter())
                .map(|n| n.value.as_str()),
            " ",
        ),
        "gene_primary" => joined(
            entry
                .genes
                .iter()
                .flat_map(|g| g.names.iter())
                .filter(|n| n.kind == "primary")
                .map(|n| n.value.as_str()),
            "; ",
        ),
        "organism_name" => text(
            entry
                .organism
                .as_ref()
                .and_then(|o| o.names.iter().find(|n| n.kind == "scientific"))
                .map(|n| n.value.as_str()),
        ),
        "organism_id" => text(
            entry
                .organism
                .as_ref()
                .and_then(|o| o.db_references.iter().find(|r| r.kind == "NCBI Taxonomy"))
                .map(|r| r.id.as_str()),
        ),
        "length" => text(entry.sequence.as_ref().and_then(|s| s.length.as_deref())),
        "mass" => text(entry.sequence.as_ref().and_then(|s| s.mass.as_deref())),
        "sequence" => {
            let seq: Option<String> = entry
                .sequence
                .as_ref()
                .map(|s| s.value.split_whitespace().collect());
            text(seq.as_deref())
        }
        "keyword" => joined(entry.keywords.iter().map(|k| k.value.as_str()), ";"),
        "date_created" => text(entry.created.as_deref()),
        "date_modified" => text(entry.modified.as_deref()),
        "version" => text(entry.version.as_deref()),
        name => match name.strip_prefix("xref_") {
            Some(db) => joined(
                entry
                    .db_references
                    .iter()
                    .filter(|r| r.kind.eq_ignore_ascii_case(db))
                    .map(|r| r.id.as_str()),
                ";",
            ),
            None => FieldValue::Absent,
        },
    }
}
