//! Unified error types for the mosaic cutter application.

use std::fmt;
use std::path::PathBuf;

/// Application-specific errors.
#[derive(Debug)]
pub enum AppError {
    /// Error opening or decoding the source image
    ImageLoad(String),
    /// Grid or output parameter outside its allowed range
    InvalidParameter(String),
    /// Grid too fine for the image: some tile would have no pixels
    DegenerateGeometry {
        rows: u32,
        cols: u32,
        width: u32,
        height: u32,
    },
    /// Filesystem failure while creating the output directory or writing a tile
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Encoder failure unrelated to I/O
    Encode(String),
    /// Export stopped by the user after `written` tiles
    Cancelled { written: usize },
    /// A second export was requested while one is still running
    ExportInProgress,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ImageLoad(msg) => write!(f, "Image load error: {}", msg),
            AppError::InvalidParameter(msg) => write!(f, "Invalid parameter: {}", msg),
            AppError::DegenerateGeometry {
                rows,
                cols,
                width,
                height,
            } => write!(
                f,
                "{}×{} grid does not fit a {}×{} image (at most one tile per pixel)",
                rows, cols, width, height
            ),
            AppError::Io { path, source } => write!(f, "{}: {}", path.display(), source),
            AppError::Encode(msg) => write!(f, "Encode error: {}", msg),
            AppError::Cancelled { written } => {
                write!(f, "Export cancelled after {} files", written)
            }
            AppError::ExportInProgress => write!(f, "An export is already running"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        AppError::ImageLoad(err.to_string())
    }
}

impl AppError {
    /// Wraps an I/O error together with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Converts an encoder error, keeping I/O failures as [`AppError::Io`].
    pub fn from_encode(path: impl Into<PathBuf>, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(source) => AppError::io(path, source),
            other => AppError::Encode(other.to_string()),
        }
    }
}

/// Type alias for Results in this application.
pub type Result<T> = std::result::Result<T, AppError>;
