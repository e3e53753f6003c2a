use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// An image file handed to the linker: its path, bare file name and byte size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

impl SourceFile {
    /// Stat `path` and build a handle for it. Anything that is not a regular
    /// file (directory, missing path, socket...) is rejected with `NotAFile`.
    pub fn open(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path).map_err(|_| Error::NotAFile(path.to_path_buf()))?;
        if !meta.is_file() {
            return Err(Error::NotAFile(path.to_path_buf()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| Error::NotAFile(path.to_path_buf()))?;
        Ok(Self {
            path: path.to_path_buf(),
            name,
            size: meta.len(),
        })
    }
}

/// Whether an image found a metadata row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Matched,
    Unmatched,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "matched"),
            MatchStatus::Unmatched => write!(f, "unmatched"),
        }
    }
}

/// Approximate position of a place, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// One image of the catalogue, joined with its metadata row (if any).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntry {
    pub id: String,
    pub source: SourceFile,
    /// Displayable reference to the image; empty when preview generation failed.
    pub preview: String,
    pub original_name: String,
    pub file_size: u64,
    /// Normalized lookup key of the matched row. `None` means unmatched.
    pub matched_id: Option<String>,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub location: String,
    pub date: String,
    pub quantity: String,
    pub note: String,
    /// Serialized as flat `lat`/`lng` fields, both present or both absent.
    #[serde(flatten)]
    pub coordinates: Option<Coordinates>,
    pub tags: Vec<String>,
    pub status: MatchStatus,
    pub match_reason: String,
}

impl CatalogueEntry {
    pub fn is_matched(&self) -> bool {
        self.status == MatchStatus::Matched
    }

    /// Case-insensitive substring search over the searchable text of the entry.
    /// An empty (or whitespace-only) query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            &self.original_name,
            &self.description,
            &self.kind,
            &self.location,
            &self.date,
            &self.note,
        ]
        .into_iter()
        .chain(self.tags.iter())
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Aggregate counters for a linking pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkStats {
    pub total: usize,
    pub matched: usize,
    pub unmatched: usize,
}

impl LinkStats {
    pub fn tally(entries: &[CatalogueEntry]) -> Self {
        let total = entries.len();
        let matched = entries.iter().filter(|e| e.is_matched()).count();
        Self {
            total,
            matched,
            unmatched: total - matched,
        }
    }
}

/// Fresh identifier for a catalogue entry (random UUID v4).
pub fn new_entry_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
