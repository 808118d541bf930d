//! Grid partition geometry.
//!
//! Splits a `width`×`height` pixel area into `rows`×`cols` rectangles in
//! row-major order. Integer division decides the base tile size; the last
//! column and the last row absorb the remainder pixels.

use crate::error::{AppError, Result};

/// Half-open pixel rectangle `[left, right) × [top, bottom)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl TileRect {
    pub fn width(&self) -> u32 {
        self.right - self.left
    }

    pub fn height(&self) -> u32 {
        self.bottom - self.top
    }

    /// Shrinks the rectangle by `trim` pixels on every side, clamped
    /// against this rectangle's own size.
    pub fn inset(&self, trim: u32) -> TileRect {
        let local = trim_rect(self.width(), self.height(), trim);
        TileRect {
            left: self.left + local.left,
            top: self.top + local.top,
            right: self.left + local.right,
            bottom: self.top + local.bottom,
        }
    }
}

/// Largest trim that still leaves a `width`×`height` tile at least 1×1.
pub fn clamp_trim(width: u32, height: u32, trim: u32) -> u32 {
    trim.min(width.saturating_sub(1) / 2)
        .min(height.saturating_sub(1) / 2)
}

/// Inset rectangle for a tile of the given size, in tile-local coordinates.
///
/// The result always keeps at least one pixel in each direction.
pub fn trim_rect(width: u32, height: u32, trim: u32) -> TileRect {
    let t = clamp_trim(width, height, trim);
    TileRect {
        left: t,
        top: t,
        right: width - t,
        bottom: height - t,
    }
}

/// Cut positions along one axis: `count + 1` edges from 0 to `extent`.
pub fn axis_edges(extent: u32, count: u32) -> Vec<u32> {
    let step = extent / count;
    (0..=count)
        .map(|i| if i == count { extent } else { i * step })
        .collect()
}

/// Checks that every tile of the grid gets at least one pixel per side.
pub fn check_grid(width: u32, height: u32, rows: u32, cols: u32) -> Result<()> {
    if rows == 0 || cols == 0 {
        return Err(AppError::InvalidParameter(format!(
            "rows and columns must be at least 1 (got {}×{})",
            rows, cols
        )));
    }
    if cols > width || rows > height {
        return Err(AppError::DegenerateGeometry {
            rows,
            cols,
            width,
            height,
        });
    }
    Ok(())
}

/// Computes the tile rectangles of a `rows`×`cols` grid in row-major order.
pub fn partition(width: u32, height: u32, rows: u32, cols: u32) -> Result<Vec<TileRect>> {
    check_grid(width, height, rows, cols)?;

    let xs = axis_edges(width, cols);
    let ys = axis_edges(height, rows);

    let rects = ys
        .windows(2)
        .flat_map(|y| {
            xs.windows(2).map(move |x| TileRect {
                left: x[0],
                top: y[0],
                right: x[1],
                bottom: y[1],
            })
        })
        .collect();

    Ok(rects)
}

/// Maps a 1-based tile index to its `(row, col)` grid position.
///
/// `None` for index 0 or a grid without columns.
pub fn tile_position(index: usize, cols: u32) -> Option<(u32, u32)> {
    if cols == 0 {
        return None;
    }
    let zero_based = u32::try_from(index.checked_sub(1)?).ok()?;
    Some((zero_based / cols, zero_based % cols))
}

/// 1-based row-major index of the tile containing source pixel `(x, y)`.
pub fn tile_at(width: u32, height: u32, rows: u32, cols: u32, x: u32, y: u32) -> Option<usize> {
    check_grid(width, height, rows, cols).ok()?;
    if x >= width || y >= height {
        return None;
    }
    let col = (x / (width / cols)).min(cols - 1);
    let row = (y / (height / rows)).min(rows - 1);
    Some((row * cols + col) as usize + 1)
}
