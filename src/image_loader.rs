use crate::error::{AppError, Result};
use crate::preview::PreviewLayout;
use image::RgbImage;
use image::imageops::{self, FilterType};
use log::debug;
use slint::{Image, Rgb8Pixel, SharedPixelBuffer};
use std::path::Path;

/// Opens a source mosaic and normalizes it to RGB8 (alpha and palette dropped).
///
/// Blocking: call from a worker thread, not the Slint event loop.
pub fn load_source_image(path: &Path) -> Result<RgbImage> {
    let start = std::time::Instant::now();
    let image = image::ImageReader::open(path)
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .with_guessed_format()
        .map_err(|e| AppError::ImageLoad(format!("{}: {}", path.display(), e)))?
        .decode()?
        .to_rgb8();

    debug!(
        "Decoded {:?} ({}x{}) in {:?}",
        path,
        image.width(),
        image.height(),
        start.elapsed()
    );
    Ok(image)
}

/// Downscales the source to the preview size of `layout`.
pub fn render_preview(source: &RgbImage, layout: &PreviewLayout) -> RgbImage {
    if (layout.preview_width, layout.preview_height) == source.dimensions() {
        return source.clone();
    }
    imageops::resize(
        source,
        layout.preview_width,
        layout.preview_height,
        FilterType::Lanczos3,
    )
}

/// Wraps RGB8 pixels in a Slint image. Must run on the UI thread.
pub fn create_slint_image(pixels: &RgbImage) -> Image {
    let buffer = SharedPixelBuffer::<Rgb8Pixel>::clone_from_slice(
        pixels.as_raw(),
        pixels.width(),
        pixels.height(),
    );
    Image::from_rgb8(buffer)
}
