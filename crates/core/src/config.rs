use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sheet::fields::FieldAliases;

/// Description stored on a matched entry whose row has no description.
pub const UNTITLED: &str = "no-title";

/// Longest edge, in pixels, of a converted raster preview.
pub const DEFAULT_PREVIEW_MAX_EDGE: u32 = 1024;

/// Knobs for a linking pass. Every field has a default, so a TOML file only
/// needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkOptions {
    pub aliases: FieldAliases,
    pub untitled_placeholder: String,
    /// Where converted TIFF previews are written, one `<entry id>.png` per
    /// file per run. Nothing is ever removed from it, so the shared default
    /// under the system temp directory grows across runs; point this at a
    /// per-catalogue directory, or clear it, when previews are no longer needed.
    pub preview_dir: PathBuf,
    pub preview_max_edge: u32,
}

impl Default for LinkOptions {
    fn default() -> Self {
        Self {
            aliases: FieldAliases::default(),
            untitled_placeholder: UNTITLED.to_string(),
            preview_dir: std::env::temp_dir().join("photolink-previews"),
            preview_max_edge: DEFAULT_PREVIEW_MAX_EDGE,
        }
    }
}

impl LinkOptions {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
