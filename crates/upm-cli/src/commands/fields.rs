//! `upm fields` command implementation

use crate::error::{CliError, Result};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use upm_core::{FieldDescriptor, FieldRegistry, StaticRegistry};

pub async fn run(category: Option<String>) -> Result<()> {
    print!("{}", render(&StaticRegistry, category.as_deref())?);
    Ok(())
}

fn render(registry: &dyn FieldRegistry, category: Option<&str>) -> Result<String> {
    let fields: Vec<&FieldDescriptor> = match category {
        Some(c) => {
            let fields = registry.fields_in_category(c);
            if fields.is_empty() {
                return Err(CliError::UnknownCategory(c.to_string()));
            }
            fields
        }
        None => registry.fields(),
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Name", "Label", "Category", "Type", "Query", "Return"]);

    for field in &fields {
        table.add_row(vec![
            field.name.to_string(),
            field.label.to_string(),
            field.category.to_string(),
            field.field_type.to_string(),
            yes_no(field.queryable),
            if field.is_default_return {
                "default".to_string()
            } else {
                yes_no(field.returnable)
            },
        ]);
    }

    Ok(format!("{}\n{} fields\n", table, fields.len()))
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_category() {
        let out = render(&StaticRegistry, Some("gene ontology (go)")).unwrap();
        assert!(out.contains("go_p"));
        assert!(!out.contains("organism_name"));
    }

    #[test]
    fn test_render_all() {
        let out = render(&StaticRegistry, None).unwrap();
        assert!(out.contains("accession"));
        assert!(out.contains("xref_pdb"));
    }

    #[test]
    fn test_unknown_category() {
        assert!(matches!(
            render(&StaticRegistry, Some("Astrology")),
            Err(CliError::UnknownCategory(_))
        ));
    }
}
