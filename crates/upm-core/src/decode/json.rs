use super::{entry, PayloadKind};
use crate::error::{MapperError, Result};
use crate::types::{DecodedPage, FailedMapping, FailureReason, FieldValue, Record};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    failed_ids: Vec<FailedId>,
    #[serde(default)]
    obsolete_ids: Vec<String>,
    #[serde(default)]
    suggested_ids: Vec<SuggestedId>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FailedId {
    Plain(String),
    Detailed {
        id: String,
        #[serde(default)]
        reason: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct SuggestedId {
    from: String,
}

pub(super) fn decode(
    body: &[u8],
    kind: PayloadKind,
    fields: &[String],
    page_index: usize,
) -> Result<DecodedPage> {
    let payload: Payload = serde_json::from_slice(body)
        .map_err(|e| MapperError::decode(page_index, format!("invalid JSON payload: {}", e)))?;

    let mut page = DecodedPage::default();
    for (row, item) in payload.results.iter().enumerate() {
        match kind {
            PayloadKind::Mapping => decode_mapping_row(item, fields, row, page_index, &mut page)?,
            PayloadKind::Search => page.records.push(decode_search_hit(item, fields, row, page_index)?),
        }
    }

    let obsolete: HashSet<&str> = payload.obsolete_ids.iter().map(String::as_str).collect();
    for failed in &payload.failed_ids {
        let mapping = match failed {
            FailedId::Plain(id) if obsolete.contains(id.as_str()) => {
                FailedMapping::new(id, FailureReason::Obsolete)
            }
            FailedId::Plain(id) => FailedMapping::new(id, FailureReason::NotFound),
            FailedId::Detailed { id, reason } => {
                let reason = match reason {
                    Some(r) => r.parse().unwrap_or(FailureReason::Unknown),
                    None if obsolete.contains(id.as_str()) => FailureReason::Obsolete,
                    None => FailureReason::NotFound,
                };
                FailedMapping::new(id, reason)
            }
        };
        page.failed.push(mapping);
    }

    let already_failed: HashSet<String> = page.failed.iter().map(|f| f.from_id.clone()).collect();
    for id in payload.obsolete_ids.iter().filter(|id| !already_failed.contains(*id)) {
        page.failed.push(FailedMapping::new(id, FailureReason::Obsolete));
    }
    for suggested in &payload.suggested_ids {
        page.failed
            .push(FailedMapping::new(&suggested.from, FailureReason::Ambiguous));
    }

    Ok(page)
}

fn decode_mapping_row(
    item: &Value,
    fields: &[String],
    row: usize,
    page_index: usize,
    page: &mut DecodedPage,
) -> Result<()> {
    let from = item
        .get("from")
        .and_then(Value::as_str)
        .ok_or_else(|| MapperError::decode(page_index, format!("result {} has no 'from'", row)))?;
    let to = item
        .get("to")
        .ok_or_else(|| MapperError::decode(page_index, format!("result {} has no 'to'", row)))?;

    match to {
        Value::String(to_id) => {
            let fields = fields.iter().map(|f| (f.clone(), FieldValue::Absent)).collect();
            page.records.push(Record {
                from_id: from.to_string(),
                to_id: to_id.clone(),
                fields,
            });
        }
        Value::Object(_) => {
            if to.get("entryType").and_then(Value::as_str) == Some("Inactive") {
                page.failed.push(FailedMapping::new(from, FailureReason::Obsolete));
                return Ok(());
            }
            let to_id = entry_id(to).ok_or_else(|| {
                MapperError::decode(page_index, format!("result {} has no target identifier", row))
            })?;
            page.records.push(Record {
                from_id: from.to_string(),
                to_id,
                fields: extract_fields(to, fields),
            });
        }
        _ => {
            return Err(MapperError::decode(
                page_index,
                format!("result {} has a malformed 'to'", row),
            ))
        }
    }
    Ok(())
}

fn decode_search_hit(item: &Value, fields: &[String], row: usize, page_index: usize) -> Result<Record> {
    let accession = item
        .get("primaryAccession")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            MapperError::decode(page_index, format!("entry {} has no primaryAccession", row))
        })?;
    Ok(Record {
        from_id: accession.to_string(),
        to_id: accession.to_string(),
        fields: extract_fields(item, fields),
    })
}

/// Identifier of a UniProtKB, UniParc or UniRef entry object
fn entry_id(entry: &Value) -> Option<String> {
    ["primaryAccession", "uniParcId", "id", "accession"]
        .iter()
        .find_map(|key| entry.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn extract_fields(entry: &Value, fields: &[String]) -> BTreeMap<String, FieldValue> {
    fields
        .iter()
        .map(|f| (f.clone(), entry::extract(entry, f)))
        .collect()
}
