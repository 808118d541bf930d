//! Application configuration constants.

/// Supported image file extensions for opening a source mosaic.
pub const SUPPORTED_IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

pub const DEFAULT_ROWS: u32 = 5;
pub const DEFAULT_COLS: u32 = 5;
pub const DEFAULT_TRIM: u32 = 0;
/// Used when the user leaves the prefix blank.
pub const DEFAULT_PREFIX: &str = "img";

/// JPEG tiles are written at high quality to keep cut edges clean.
pub const JPEG_QUALITY: u8 = 95;

/// Gap in logical pixels between the preview image and the preview area border.
pub const PREVIEW_MARGIN: f32 = 10.0;
/// Smallest viewport side considered when fitting the preview.
pub const MIN_VIEWPORT_SIDE: f32 = 50.0;
/// Thickness of the overlay grid lines in logical pixels.
pub const GRID_LINE_WIDTH: f32 = 2.0;
