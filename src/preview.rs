//! Preview geometry: fitting the source into the viewport and placing the
//! grid overlay in preview coordinates.

use crate::config::{GRID_LINE_WIDTH, MIN_VIEWPORT_SIDE, PREVIEW_MARGIN};
use crate::error::Result;
use crate::grid;

/// How the source image maps onto the preview area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewLayout {
    /// Preview pixels per source pixel, never above 1.0.
    pub scale: f32,
    pub preview_width: u32,
    pub preview_height: u32,
    pub source_width: u32,
    pub source_height: u32,
}

/// Axis-aligned line segment relative to the preview image origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayLine {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Scales the source down (never up) to fit the viewport minus margins.
pub fn fit_preview(
    source_width: u32,
    source_height: u32,
    viewport_width: f32,
    viewport_height: f32,
) -> PreviewLayout {
    let available_w = viewport_width.max(MIN_VIEWPORT_SIDE) - 2.0 * PREVIEW_MARGIN;
    let available_h = viewport_height.max(MIN_VIEWPORT_SIDE) - 2.0 * PREVIEW_MARGIN;

    let scale = (available_w / source_width.max(1) as f32)
        .min(available_h / source_height.max(1) as f32)
        .min(1.0);

    PreviewLayout {
        scale,
        preview_width: ((source_width as f32 * scale) as u32).max(1),
        preview_height: ((source_height as f32 * scale) as u32).max(1),
        source_width,
        source_height,
    }
}

impl PreviewLayout {
    /// Maps a point of the preview image to the source pixel under it.
    pub fn to_source(&self, x: f32, y: f32) -> (u32, u32) {
        let sx = (x.max(0.0) / self.scale) as u32;
        let sy = (y.max(0.0) / self.scale) as u32;
        (
            sx.min(self.source_width.saturating_sub(1)),
            sy.min(self.source_height.saturating_sub(1)),
        )
    }

    /// Maps a source coordinate to preview space.
    pub fn to_preview(&self, source: u32) -> f32 {
        source as f32 * self.scale
    }
}

/// Interior grid lines drawn on the preview, placed on the scaled cut
/// positions the exporter uses.
///
/// Counts below 1 are treated as 1 so a half-typed value still draws.
pub fn grid_overlay(layout: &PreviewLayout, rows: i32, cols: i32) -> Result<Vec<OverlayLine>> {
    let rows = rows.max(1) as u32;
    let cols = cols.max(1) as u32;
    grid::check_grid(layout.source_width, layout.source_height, rows, cols)?;

    let half = GRID_LINE_WIDTH / 2.0;
    let width = layout.preview_width as f32;
    let height = layout.preview_height as f32;

    let xs = grid::axis_edges(layout.source_width, cols);
    let ys = grid::axis_edges(layout.source_height, rows);

    let vertical = xs[1..xs.len() - 1].iter().map(|&x| OverlayLine {
        x: layout.to_preview(x) - half,
        y: 0.0,
        width: GRID_LINE_WIDTH,
        height,
    });
    let horizontal = ys[1..ys.len() - 1].iter().map(|&y| OverlayLine {
        x: 0.0,
        y: layout.to_preview(y) - half,
        width,
        height: GRID_LINE_WIDTH,
    });

    Ok(vertical.chain(horizontal).collect())
}

/// Tile count caption shown over the preview.
pub fn grid_label(rows: i32, cols: i32) -> String {
    let rows = rows.max(1);
    let cols = cols.max(1);
    format!("{}×{} = {} tiles", rows, cols, rows as i64 * cols as i64)
}
