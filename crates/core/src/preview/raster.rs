use std::path::{Path, PathBuf};

use fast_image_resize::{self as fir, images::Image as FirImage};
use image::{ImageFormat, RgbaImage};
use tracing::warn;

use super::file_url;
use crate::error::{Error, Result};

/// Convert a TIFF file to a PNG preview at `target` and return its URL.
///
/// Reads the whole file, decodes the first frame off the async executor and
/// downsizes so the longest edge is at most `max_edge` (0 keeps full size).
/// Any failure (unreadable file, decode error, empty image) yields an empty
/// string. No retry, no timeout.
pub async fn convert(source: &Path, target: &Path, max_edge: u32) -> String {
    match try_convert(source, target, max_edge).await {
        Ok(url) => url,
        Err(e) => {
            warn!(path = %source.display(), error = %e, "raster preview failed");
            String::new()
        }
    }
}

async fn try_convert(source: &Path, target: &Path, max_edge: u32) -> Result<String> {
    let bytes = tokio::fs::read(source).await?;
    let source_path = source.to_path_buf();
    let target_path = target.to_path_buf();
    let written = tokio::task::spawn_blocking(move || {
        render_png(&bytes, &target_path, max_edge, &source_path)
    })
    .await??;
    file_url(&written)
}

fn render_png(bytes: &[u8], target: &Path, max_edge: u32, source: &Path) -> Result<PathBuf> {
    let failed = |message: String| Error::PreviewFailed {
        path: source.to_path_buf(),
        message,
    };

    let img = image::load_from_memory_with_format(bytes, ImageFormat::Tiff)?;
    let (w, h) = (img.width(), img.height());
    if w == 0 || h == 0 {
        return Err(failed("image has no decoded pixels".to_string()));
    }

    let (dw, dh) = fit_within(w, h, max_edge);
    let rgba = img.to_rgba8().into_raw();
    let pixels = if (dw, dh) == (w, h) {
        rgba
    } else {
        let src = FirImage::from_vec_u8(w, h, rgba, fir::PixelType::U8x4)
            .map_err(|e| failed(e.to_string()))?;
        let mut dst = FirImage::new(dw, dh, fir::PixelType::U8x4);
        fir::Resizer::new()
            .resize(&src, &mut dst, None)
            .map_err(|e| failed(e.to_string()))?;
        dst.buffer().to_vec()
    };

    let out = RgbaImage::from_raw(dw, dh, pixels)
        .ok_or_else(|| failed("resized buffer has wrong length".to_string()))?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    out.save_with_format(target, ImageFormat::Png)?;
    Ok(target.to_path_buf())
}

/// Scale `(w, h)` so the longest edge is at most `max_edge`, keeping aspect
/// ratio. Never upscales; each edge stays at least 1 pixel.
fn fit_within(w: u32, h: u32, max_edge: u32) -> (u32, u32) {
    let longest = w.max(h);
    if max_edge == 0 || longest <= max_edge {
        return (w, h);
    }
    let scale = |edge: u32| ((edge as u64 * max_edge as u64) / longest as u64).max(1) as u32;
    (scale(w), scale(h))
}
