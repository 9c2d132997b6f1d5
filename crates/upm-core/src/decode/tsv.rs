use super::PayloadKind;
use crate::error::{MapperError, Result};
use crate::fields::FieldRegistry;
use crate::types::{DecodedPage, FieldValue, Record};

const FROM: &str = "From";
const TO: &str = "To";
const ENTRY: &str = "Entry";

/// Decode a tab-separated page
///
/// The first non-empty line is the header. Requested fields are matched to
/// columns by field name or by the registry label the service prints.
pub(super) fn decode(
    text: &str,
    kind: PayloadKind,
    fields: &[String],
    registry: &dyn FieldRegistry,
    page_index: usize,
) -> Result<DecodedPage> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Ok(DecodedPage::default());
    };
    let header: Vec<&str> = header_line.split('\t').map(str::trim).collect();
    let column = |name: &str| header.iter().position(|h| *h == name);

    let (from_col, to_col) = match kind {
        PayloadKind::Mapping => {
            let from = column(FROM).ok_or_else(|| {
                MapperError::decode(page_index, format!("TSV header has no '{}' column", FROM))
            })?;
            let to = column(TO).or_else(|| column(ENTRY)).ok_or_else(|| {
                MapperError::decode(
                    page_index,
                    format!("TSV header has neither '{}' nor '{}'", TO, ENTRY),
                )
            })?;
            (from, to)
        }
        PayloadKind::Search => {
            let entry = column(ENTRY).ok_or_else(|| {
                MapperError::decode(page_index, format!("TSV header has no '{}' column", ENTRY))
            })?;
            (entry, entry)
        }
    };

    let field_cols: Vec<(String, Option<usize>)> = fields
        .iter()
        .map(|name| {
            let by_name = column(name);
            let by_label = || registry.lookup(name).and_then(|f| column(f.label));
            (name.clone(), by_name.or_else(by_label))
        })
        .collect();

    let mut page = DecodedPage::default();
    for (row, line) in lines.enumerate() {
        let cells: Vec<&str> = line.split('\t').collect();
        if cells.len() != header.len() {
            return Err(MapperError::decode(
                page_index,
                format!(
                    "row {} has {} columns, header has {}",
                    row + 1,
                    cells.len(),
                    header.len()
                ),
            ));
        }

        let fields = field_cols
            .iter()
            .map(|(name, col)| {
                let value = match col {
                    Some(i) => FieldValue::Text(cells[*i].to_string()),
                    None => FieldValue::Absent,
                };
                (name.clone(), value)
            })
            .collect();

        page.records.push(Record {
            from_id: cells[from_col].to_string(),
            to_id: cells[to_col].to_string(),
            fields,
        });
    }

    Ok(page)
}
