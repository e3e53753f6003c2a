use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use photolink_core::{build_catalogue, CatalogueEntry, LinkOptions, LinkReport, MatchStatus};

pub async fn run(
    csv: &Path,
    inputs: &[PathBuf],
    options: LinkOptions,
    json: bool,
    query: Option<&str>,
) -> Result<()> {
    let report = build_catalogue(csv, inputs, options).await?;

    let shown: Vec<&CatalogueEntry> = report
        .entries
        .iter()
        .filter(|e| query.is_none_or(|q| e.matches_query(q)))
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "entries": shown,
                "stats": report.stats,
            }))?
        );
        return Ok(());
    }

    print_table(&shown);
    print_summary(&report, shown.len());
    Ok(())
}

fn print_table(entries: &[&CatalogueEntry]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("File"),
        Cell::new("Size"),
        Cell::new("Status"),
        Cell::new("Description"),
        Cell::new("Location"),
        Cell::new("Coordinates"),
    ]);

    for entry in entries {
        table.add_row(entry_row(entry));
    }

    println!();
    println!("{table}");
}

fn entry_row(entry: &CatalogueEntry) -> Vec<Cell> {
    let status = match entry.status {
        MatchStatus::Matched => Cell::new("matched").fg(Color::Green),
        MatchStatus::Unmatched => Cell::new(&entry.match_reason).fg(Color::Yellow),
    };
    let coordinates = match entry.coordinates {
        Some(c) => Cell::new(format_coordinates(c.lat, c.lng)).fg(Color::Cyan),
        None => Cell::new("\u{2014}").fg(Color::DarkGrey),
    };

    vec![
        Cell::new(&entry.original_name),
        Cell::new(format_size(entry.file_size)),
        status,
        Cell::new(&entry.description),
        Cell::new(&entry.location),
        coordinates,
    ]
}

fn print_summary(report: &LinkReport, shown: usize) {
    println!();
    println!(
        "  {} files ({} matched, {} unmatched)",
        report.stats.total, report.stats.matched, report.stats.unmatched
    );
    if shown != report.entries.len() {
        println!("  {} shown by search", shown);
    }
    for (path, reason) in &report.rejected {
        println!("  skipped {}: {}", path.display(), reason);
    }
    println!();
}

pub(crate) fn format_coordinates(lat: f64, lng: f64) -> String {
    format!("{lat:.4}, {lng:.4}")
}

pub(crate) fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    match bytes {
        b if b >= GB => format!("{:.1} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{} B", b),
    }
}
