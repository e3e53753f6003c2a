use std::path::Path;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use photolink_core::sheet;

pub fn run(csv: &Path) -> Result<()> {
    let rows = sheet::read_rows(csv)?;

    let Some(first) = rows.first() else {
        println!("No data rows in {}.", csv.display());
        return Ok(());
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(first.headers().map(Cell::new).collect::<Vec<_>>());

    for row in &rows {
        table.add_row(row.iter().map(|(_, v)| Cell::new(v)).collect::<Vec<_>>());
    }

    println!("{table}");
    println!("  {} rows", rows.len());
    Ok(())
}
