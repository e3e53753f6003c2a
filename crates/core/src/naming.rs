/// Image extensions the scanner and previewer recognise (lowercase).
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "heic", "tif", "tiff",
];

/// Reduce a file name to its lookup key: drop the extension, then a trailing
/// duplicate marker such as ` (1)`, then surrounding whitespace.
/// Case is preserved.
pub fn normalize(filename: &str) -> String {
    let stem = match filename.rfind('.') {
        Some(dot) => &filename[..dot],
        None => filename,
    };
    strip_duplicate_suffix(stem).trim().to_string()
}

/// Remove `\s*\(\d+\)` at the very end of `s`, if present.
fn strip_duplicate_suffix(s: &str) -> &str {
    let Some(inner) = s.strip_suffix(')') else {
        return s;
    };
    let digits_start = inner.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits_start == inner.len() {
        return s;
    }
    match inner[..digits_start].strip_suffix('(') {
        Some(head) => head.trim_end(),
        None => s,
    }
}

/// Lowercased extension (without the dot), if the name has one.
pub fn extension(filename: &str) -> Option<String> {
    filename
        .rfind('.')
        .map(|dot| filename[dot + 1..].to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// TIFF-family files need raster conversion before they can be displayed.
pub fn is_tiff(filename: &str) -> bool {
    matches!(extension(filename).as_deref(), Some("tif" | "tiff"))
}

pub fn is_image(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
