//! Directory enumeration and decode into [`Buffer2D`] frames.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use strata_flow::CancelSignal;
use strata_raster::{Buffer2D, Pixel};
use tracing::{debug, warn};

use crate::error::LoadError;

const RECOGNIZED: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Decode every recognized image in `dir` into a frame.
///
/// Files are visited in sorted order so runs are deterministic. The
/// signal is consulted before each file; a request aborts the scan
/// without returning a partially loaded set. A file that fails to decode
/// is skipped with a warning rather than treated as a pipeline fault.
/// An empty directory yields an empty frame list, not an error.
///
/// # Errors
///
/// [`LoadError::Cancelled`] when cancellation is requested mid-scan,
/// [`LoadError::Io`] when the directory cannot be read.
pub async fn load_frames(dir: &Path, cancel: &CancelSignal) -> Result<Vec<Buffer2D>, LoadError> {
    let mut paths = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if recognized(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut frames = Vec::with_capacity(paths.len());
    for path in paths {
        if cancel.is_requested() {
            debug!("scan cancelled");
            return Err(LoadError::Cancelled);
        }
        let decoded = tokio::task::spawn_blocking({
            let path = path.clone();
            move || image::open(&path)
        })
        .await?;
        match decoded {
            Ok(img) => frames.push(frame_from_rgba(&img.to_rgba8())),
            Err(e) => warn!(path = %path.display(), error = %e, "skipping undecodable file"),
        }
    }
    debug!(frames = frames.len(), "directory loaded");
    Ok(frames)
}

/// Encode a frame as PNG at `path`.
///
/// # Errors
///
/// [`LoadError::Encode`] when encoding or writing fails.
pub async fn save_png(frame: &Buffer2D, path: &Path) -> Result<(), LoadError> {
    let mut rgba = RgbaImage::new(frame.width(), frame.height());
    for (x, y, out) in rgba.enumerate_pixels_mut() {
        let Pixel([a, r, g, b]) = frame.pixel(x, y);
        *out = image::Rgba([r, g, b, a]);
    }
    let path = path.to_owned();
    tokio::task::spawn_blocking(move || rgba.save_with_format(&path, image::ImageFormat::Png))
        .await??;
    Ok(())
}

fn recognized(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| RECOGNIZED.iter().any(|r| ext.eq_ignore_ascii_case(r)))
}

/// Map decoded RGBA to a frame with channel 0 as the alpha/weight channel.
fn frame_from_rgba(image: &RgbaImage) -> Buffer2D {
    let (width, height) = image.dimensions();
    let mut frame = Buffer2D::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b, a] = pixel.0;
        frame.set(x, y, Pixel([a, r, g, b]));
    }
    frame
}
