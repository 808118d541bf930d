//! Core of the mosaic cutter: grid partition geometry, tile export, preview
//! geometry and the session state shared with the Slint shell.

pub mod config;
pub mod error;
pub mod export;
pub mod file_utils;
pub mod grid;
pub mod image_loader;
pub mod preview;
pub mod services;
pub mod state;

pub use error::{AppError, Result};
pub use export::{GridConfig, OutputFormat, export_tiles, export_tiles_with};
pub use grid::{TileRect, partition};
