//! `upm databases` command implementation

use crate::error::Result;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use upm_core::fields::MAPPING_DATABASES;

pub async fn run() -> Result<()> {
    print!("{}", render());
    Ok(())
}

fn render() -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Category", "Databases"]);

    for (category, names) in MAPPING_DATABASES {
        table.add_row(vec![category.to_string(), names.join(", ")]);
    }
    format!("{}\n", table)
}
