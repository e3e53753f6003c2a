pub mod config;
pub mod domain;
pub mod error;
pub mod geocode;
pub mod linking;
pub mod naming;
pub mod preview;
pub mod scanner;
pub mod sheet;

use std::path::{Path, PathBuf};

pub use config::LinkOptions;
pub use domain::{CatalogueEntry, Coordinates, LinkStats, MatchStatus, SourceFile};
pub use error::{Error, Result};
pub use geocode::{Gazetteer, Geocoder};
pub use linking::{LinkReport, Linker};
pub use preview::{FilePreviewer, PreviewGenerator};
pub use sheet::Row;

/// Read the metadata table at `csv_path`, expand `inputs` (files and
/// directories) into image paths, and link them with the built-in gazetteer.
///
/// Only a missing or unreadable table, or an unreadable input directory, is an
/// error. Per-file problems end up in the report.
pub async fn build_catalogue(
    csv_path: &Path,
    inputs: &[PathBuf],
    options: LinkOptions,
) -> Result<LinkReport> {
    let rows = sheet::read_rows(csv_path)?;
    let files = scanner::expand_inputs(inputs)?;
    let linker = Linker::with_options(options);
    Ok(linker.link(&files, &rows).await)
}
