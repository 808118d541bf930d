//! Tile export: crops every grid cell out of the source image and writes it
//! to `{prefix}_{index:03}.{ext}` in the output directory.

use crate::config::{DEFAULT_COLS, DEFAULT_PREFIX, DEFAULT_ROWS, DEFAULT_TRIM, JPEG_QUALITY};
use crate::error::{AppError, Result};
use crate::grid;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{RgbImage, imageops};
use jpeg_encoder::{ColorType, Encoder as JpegEncoder, EncodingError, SamplingFactor};
use log::{debug, info};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

/// Encoding of the exported tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpg,
    Webp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Png, OutputFormat::Jpg, OutputFormat::Webp];

    /// File extension, also the name shown in the format picker.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = AppError;

    /// Accepts `png`, `jpg` and `webp` in any case. A blank value means png.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(OutputFormat::Png);
        }
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.extension() == normalized)
            .ok_or_else(|| {
                AppError::InvalidParameter(format!(
                    "unsupported format \"{}\" (expected png, jpg or webp)",
                    s.trim()
                ))
            })
    }
}

/// Grid and output settings for one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub rows: u32,
    pub cols: u32,
    pub trim: u32,
    pub prefix: String,
    pub format: OutputFormat,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            trim: DEFAULT_TRIM,
            prefix: DEFAULT_PREFIX.to_string(),
            format: OutputFormat::Png,
        }
    }
}

impl GridConfig {
    /// Builds a config from raw UI values, rejecting anything out of range.
    pub fn from_input(rows: i32, cols: i32, trim: i32, prefix: &str, format: &str) -> Result<Self> {
        let rows = positive("rows", rows)?;
        let cols = positive("columns", cols)?;
        let trim = u32::try_from(trim).map_err(|_| {
            AppError::InvalidParameter(format!("trim must not be negative (got {})", trim))
        })?;

        let prefix = match prefix.trim() {
            "" => DEFAULT_PREFIX.to_string(),
            p => p.to_string(),
        };
        let format = format.parse()?;

        Ok(Self {
            rows,
            cols,
            trim,
            prefix,
            format,
        })
    }

    pub fn tile_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// File name of the tile with the given 1-based index.
    pub fn tile_file_name(&self, index: usize) -> String {
        format!("{}_{:03}.{}", self.prefix, index, self.format.extension())
    }
}

fn positive(name: &str, value: i32) -> Result<u32> {
    u32::try_from(value)
        .ok()
        .filter(|&v| v >= 1)
        .ok_or_else(|| {
            AppError::InvalidParameter(format!("{} must be at least 1 (got {})", name, value))
        })
}

/// Writes every tile of `image` into `output_dir`.
///
/// Returns the number of files written, always `rows × cols` on success.
pub fn export_tiles(image: &RgbImage, output_dir: &Path, config: &GridConfig) -> Result<usize> {
    let never = AtomicBool::new(false);
    export_tiles_with(image, output_dir, config, &never, |_, _| {})
}

/// Like [`export_tiles`], checking `cancel` before each tile and calling
/// `progress(written, total)` after each one.
///
/// Files written before a failure or cancellation stay on disk.
pub fn export_tiles_with(
    image: &RgbImage,
    output_dir: &Path,
    config: &GridConfig,
    cancel: &AtomicBool,
    mut progress: impl FnMut(usize, usize),
) -> Result<usize> {
    let start = std::time::Instant::now();
    let rects = grid::partition(image.width(), image.height(), config.rows, config.cols)?;
    let total = rects.len();

    fs::create_dir_all(output_dir).map_err(|e| AppError::io(output_dir, e))?;

    for (i, rect) in rects.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            info!("Export cancelled after {} of {} tiles", i, total);
            return Err(AppError::Cancelled { written: i });
        }

        let index = i + 1;
        let cut = rect.inset(config.trim);
        let tile = imageops::crop_imm(image, cut.left, cut.top, cut.width(), cut.height()).to_image();

        let path = output_dir.join(config.tile_file_name(index));
        write_tile(&tile, &path, config.format)?;
        debug!(
            "Wrote {} ({}x{} at {},{})",
            path.display(),
            cut.width(),
            cut.height(),
            cut.left,
            cut.top
        );

        progress(index, total);
    }

    info!(
        "Exported {} tiles to {} in {:?}",
        total,
        output_dir.display(),
        start.elapsed()
    );
    Ok(total)
}

/// Encodes one tile and writes it to `path`, replacing any existing file.
fn write_tile(tile: &RgbImage, path: &Path, format: OutputFormat) -> Result<()> {
    let file = File::create(path).map_err(|e| AppError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    let encoded = match format {
        OutputFormat::Png => tile.write_with_encoder(PngEncoder::new(&mut writer)),
        OutputFormat::Jpg => return write_jpeg(tile, path, writer),
        OutputFormat::Webp => tile.write_with_encoder(WebPEncoder::new_lossless(&mut writer)),
    };
    encoded.map_err(|e| AppError::from_encode(path, e))?;

    writer.flush().map_err(|e| AppError::io(path, e))
}

/// JPEG tiles keep full chroma resolution (4:4:4) and use per-image
/// optimized Huffman tables.
fn write_jpeg(tile: &RgbImage, path: &Path, mut writer: BufWriter<File>) -> Result<()> {
    let (width, height) = match (u16::try_from(tile.width()), u16::try_from(tile.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(AppError::Encode(format!(
                "{}x{} tile exceeds the JPEG size limit of 65535 px",
                tile.width(),
                tile.height()
            )));
        }
    };

    let mut encoder = JpegEncoder::new(&mut writer, JPEG_QUALITY);
    encoder.set_sampling_factor(SamplingFactor::R_4_4_4);
    encoder.set_optimized_huffman_tables(true);
    encoder
        .encode(tile.as_raw(), width, height, ColorType::Rgb)
        .map_err(|e| match e {
            EncodingError::IoError(source) => AppError::io(path, source),
            other => AppError::Encode(other.to_string()),
        })?;

    writer.flush().map_err(|e| AppError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::path::PathBuf;

    /// Image whose pixel at (x, y) encodes its own coordinates.
    fn coordinate_image(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 7]))
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn default_grid_writes_25_numbered_pngs() {
        let out = tempfile::tempdir().unwrap();
        let image = coordinate_image(50, 40);

        let count = export_tiles(&image, out.path(), &GridConfig::default()).unwrap();

        assert_eq!(count, 25);
        let expected: Vec<String> = (1..=25).map(|i| format!("img_{:03}.png", i)).collect();
        assert_eq!(files_in(out.path()), expected);
    }

    #[test]
    fn tiles_carry_the_trimmed_source_pixels() {
        let out = tempfile::tempdir().unwrap();
        let image = coordinate_image(10, 7);
        let config = GridConfig {
            rows: 2,
            cols: 3,
            trim: 1,
            ..GridConfig::default()
        };

        export_tiles(&image, out.path(), &config).unwrap();

        // Tile 6 is row 1, col 2: source rect x 6..10, y 3..7, trimmed to 7..9, 4..6.
        let last = image::open(out.path().join("img_006.png")).unwrap().to_rgb8();
        assert_eq!(last.dimensions(), (2, 2));
        assert_eq!(last.get_pixel(0, 0), &Rgb([7, 4, 7]));
        assert_eq!(last.get_pixel(1, 1), &Rgb([8, 5, 7]));

        // Tile 1 is 3×3, trim 1 leaves its centre pixel.
        let first = image::open(out.path().join("img_001.png")).unwrap().to_rgb8();
        assert_eq!(first.dimensions(), (1, 1));
        assert_eq!(first.get_pixel(0, 0), &Rgb([1, 1, 7]));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let root = tempfile::tempdir().unwrap();
        let nested: PathBuf = root.path().join("a").join("b");
        let config = GridConfig {
            rows: 1,
            cols: 2,
            ..GridConfig::default()
        };

        assert_eq!(export_tiles(&coordinate_image(4, 4), &nested, &config).unwrap(), 2);
        assert!(nested.join("img_002.png").is_file());
    }

    #[test]
    fn re_export_overwrites_without_error() {
        let out = tempfile::tempdir().unwrap();
        let image = coordinate_image(12, 12);
        let config = GridConfig {
            rows: 2,
            cols: 2,
            ..GridConfig::default()
        };

        assert_eq!(export_tiles(&image, out.path(), &config).unwrap(), 4);
        assert_eq!(export_tiles(&image, out.path(), &config).unwrap(), 4);
        assert_eq!(files_in(out.path()).len(), 4);
    }

    #[test]
    fn jpg_and_webp_tiles_decode_with_expected_size() {
        let out = tempfile::tempdir().unwrap();
        let image = coordinate_image(30, 20);

        for format in [OutputFormat::Jpg, OutputFormat::Webp] {
            let config = GridConfig {
                rows: 2,
                cols: 3,
                prefix: "tile".to_string(),
                format,
                ..GridConfig::default()
            };
            export_tiles(&image, out.path(), &config).unwrap();

            let path = out.path().join(format!("tile_004.{}", format));
            let decoded = image::open(&path).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (10, 10));
        }
    }

    /// Component sampling bytes from the SOF0 segment of a JPEG file.
    fn jpeg_sampling_factors(bytes: &[u8]) -> Vec<u8> {
        let mut pos = 2;
        while pos + 4 <= bytes.len() {
            assert_eq!(bytes[pos], 0xFF, "segment marker expected at {}", pos);
            let marker = bytes[pos + 1];
            let len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
            if marker == 0xC0 {
                let segment = &bytes[pos + 4..pos + 2 + len];
                let components = segment[5] as usize;
                return (0..components).map(|c| segment[6 + c * 3 + 1]).collect();
            }
            pos += 2 + len;
        }
        panic!("no SOF0 segment");
    }

    #[test]
    fn jpg_tiles_keep_full_chroma_resolution() {
        let out = tempfile::tempdir().unwrap();
        let config = GridConfig {
            rows: 1,
            cols: 1,
            format: OutputFormat::Jpg,
            ..GridConfig::default()
        };

        export_tiles(&coordinate_image(64, 64), out.path(), &config).unwrap();

        let bytes = fs::read(out.path().join("img_001.jpg")).unwrap();
        assert_eq!(jpeg_sampling_factors(&bytes), vec![0x11, 0x11, 0x11]);
        assert_eq!(image::load_from_memory(&bytes).unwrap().width(), 64);
    }

    #[test]
    fn degenerate_grid_writes_nothing() {
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("tiles");
        let config = GridConfig {
            rows: 1,
            cols: 2000,
            ..GridConfig::default()
        };

        let err = export_tiles(&coordinate_image(10, 10), &target, &config).unwrap_err();

        assert!(matches!(err, AppError::DegenerateGeometry { .. }));
        assert!(!target.exists());
    }

    #[test]
    fn gif_is_rejected_before_any_output() {
        let err = GridConfig::from_input(5, 5, 0, "img", "gif").unwrap_err();
        assert!(matches!(err, AppError::InvalidParameter(_)));
    }

    #[test]
    fn input_defaults_and_range_checks() {
        let config = GridConfig::from_input(2, 3, 4, "   ", " JPG ").unwrap();
        assert_eq!(config.prefix, "img");
        assert_eq!(config.format, OutputFormat::Jpg);
        assert_eq!(config.tile_count(), 6);

        assert_eq!(GridConfig::from_input(1, 1, 0, "x", "").unwrap().format, OutputFormat::Png);
        assert!(GridConfig::from_input(0, 1, 0, "x", "png").is_err());
        assert!(GridConfig::from_input(1, -2, 0, "x", "png").is_err());
        assert!(GridConfig::from_input(1, 1, -1, "x", "png").is_err());
    }

    #[test]
    fn file_names_are_zero_padded() {
        let config = GridConfig {
            prefix: "mosaic".to_string(),
            format: OutputFormat::Webp,
            ..GridConfig::default()
        };
        assert_eq!(config.tile_file_name(7), "mosaic_007.webp");
        assert_eq!(config.tile_file_name(1234), "mosaic_1234.webp");
    }

    #[test]
    fn cancel_before_start_writes_no_files() {
        let out = tempfile::tempdir().unwrap();
        let cancel = AtomicBool::new(true);

        let err = export_tiles_with(
            &coordinate_image(8, 8),
            out.path(),
            &GridConfig::default(),
            &cancel,
            |_, _| {},
        )
        .unwrap_err();

        assert!(matches!(err, AppError::Cancelled { written: 0 }));
        assert!(files_in(out.path()).is_empty());
    }

    #[test]
    fn progress_and_cancel_mid_export() {
        let out = tempfile::tempdir().unwrap();
        let cancel = AtomicBool::new(false);
        let mut seen = Vec::new();

        let err = export_tiles_with(
            &coordinate_image(9, 9),
            out.path(),
            &GridConfig {
                rows: 3,
                cols: 3,
                ..GridConfig::default()
            },
            &cancel,
            |written, total| {
                seen.push((written, total));
                if written == 4 {
                    cancel.store(true, Ordering::Relaxed);
                }
            },
        )
        .unwrap_err();

        assert!(matches!(err, AppError::Cancelled { written: 4 }));
        assert_eq!(seen, vec![(1, 9), (2, 9), (3, 9), (4, 9)]);
        assert_eq!(files_in(out.path()).len(), 4);
    }

    #[test]
    fn unwritable_output_reports_io_error() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let err = export_tiles(&coordinate_image(4, 4), &blocker.join("out"), &GridConfig {
            rows: 1,
            cols: 1,
            ..GridConfig::default()
        })
        .unwrap_err();

        assert!(matches!(err, AppError::Io { .. }));
    }
}
