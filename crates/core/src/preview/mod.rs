pub mod raster;

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::config::LinkOptions;
use crate::domain::SourceFile;
use crate::error::Result;
use crate::naming;

/// Produces a displayable reference (a URL) for an image file.
///
/// An `Err` or an empty string both mean "no preview"; the linker never lets
/// either abort an entry.
#[allow(async_fn_in_trait)]
pub trait PreviewGenerator {
    async fn preview(&self, file: &SourceFile, entry_id: &str) -> Result<String>;
}

/// Default previewer: browsers can show most formats straight from disk, so
/// those get a `file://` URL to the original. TIFF files are converted to a PNG
/// in `dir`, named after the entry id.
#[derive(Debug, Clone)]
pub struct FilePreviewer {
    dir: PathBuf,
    max_edge: u32,
}

impl FilePreviewer {
    pub fn new(dir: impl Into<PathBuf>, max_edge: u32) -> Self {
        Self {
            dir: dir.into(),
            max_edge,
        }
    }

    pub fn from_options(options: &LinkOptions) -> Self {
        Self::new(options.preview_dir.clone(), options.preview_max_edge)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PreviewGenerator for FilePreviewer {
    async fn preview(&self, file: &SourceFile, entry_id: &str) -> Result<String> {
        if naming::is_tiff(&file.name) {
            let target = self.dir.join(format!("{entry_id}.png"));
            return Ok(raster::convert(&file.path, &target, self.max_edge).await);
        }
        file_url(&file.path)
    }
}

/// `file://` URL for a local path (made absolute against the working directory).
/// Every path segment is percent-encoded, so `#`, `?`, `%` and spaces in file
/// names stay part of the path.
pub fn file_url(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)?;
    let mut url = String::from("file://");
    for component in absolute.components() {
        match component {
            Component::RootDir => {}
            Component::Prefix(prefix) => {
                url.push('/');
                url.push_str(&prefix.as_os_str().to_string_lossy());
            }
            other => {
                url.push('/');
                url.push_str(&encode_segment(other.as_os_str()));
            }
        }
    }
    if url.len() == "file://".len() {
        url.push('/');
    }
    Ok(url)
}

#[cfg(unix)]
fn encode_segment(segment: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;
    urlencoding::encode_binary(segment.as_bytes()).into_owned()
}

#[cfg(not(unix))]
fn encode_segment(segment: &OsStr) -> String {
    urlencoding::encode(&segment.to_string_lossy()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(path: &Path) -> SourceFile {
        SourceFile::open(path).unwrap()
    }

    #[test]
    fn test_file_url_absolute() {
        let url = file_url(Path::new("/photos/a.jpg")).unwrap();
        assert_eq!(url, "file:///photos/a.jpg");
    }

    #[test]
    fn test_file_url_escapes_reserved_characters() {
        let url = file_url(Path::new("/photos/Bowl #1 50%?.jpg")).unwrap();
        assert_eq!(url, "file:///photos/Bowl%20%231%2050%25%3F.jpg");
        assert!(!url.contains(' '));
        assert!(!url.contains('#'));
    }

    #[test]
    fn test_file_url_encodes_unicode_as_utf8() {
        let url = file_url(Path::new("/фото/чаша.jpg")).unwrap();
        assert_eq!(
            url,
            "file:///%D1%84%D0%BE%D1%82%D0%BE/%D1%87%D0%B0%D1%88%D0%B0.jpg"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_file_url_keeps_non_utf8_bytes() {
        use std::os::unix::ffi::OsStrExt;
        let name = OsStr::from_bytes(b"scan_\xff.jpg");
        let url = file_url(&Path::new("/photos").join(name)).unwrap();
        assert_eq!(url, "file:///photos/scan_%FF.jpg");
    }

    #[test]
    fn test_file_url_root() {
        assert_eq!(file_url(Path::new("/")).unwrap(), "file:///");
    }

    #[test]
    fn test_file_url_relative_made_absolute() {
        let url = file_url(Path::new("a.jpg")).unwrap();
        assert!(url.starts_with("file:///"));
        assert!(url.ends_with("a.jpg"));
    }

    #[tokio::test]
    async fn test_jpeg_gets_direct_url() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("bowl.jpg");
        image::RgbImage::from_fn(8, 8, |_, _| image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let previewer = FilePreviewer::new(tmp.path().join("previews"), 64);
        let url = previewer.preview(&source(&path), "id-1").await.unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("bowl.jpg"));
        // No conversion happened
        assert!(!tmp.path().join("previews").exists());
    }

    #[tokio::test]
    async fn test_tiff_converted_into_preview_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scan.tif");
        image::RgbImage::from_fn(16, 8, |x, _| image::Rgb([(x * 10) as u8, 0, 0]))
            .save(&path)
            .unwrap();

        let previewer = FilePreviewer::new(tmp.path().join("previews"), 64);
        let url = previewer.preview(&source(&path), "id-2").await.unwrap();
        assert!(url.ends_with("id-2.png"));
        assert!(tmp.path().join("previews/id-2.png").exists());
    }

    #[tokio::test]
    async fn test_corrupt_tiff_gives_empty_preview() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.tiff");
        std::fs::write(&path, b"II*\0 definitely not a tiff").unwrap();

        let previewer = FilePreviewer::new(tmp.path().join("previews"), 64);
        let url = previewer.preview(&source(&path), "id-3").await.unwrap();
        assert_eq!(url, "");
    }
}
