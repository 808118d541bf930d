//! Image loading, preview rendering and grid overlay display.
//!
//! Uses `rayon::spawn` for decoding and downscaling, then
//! `slint::invoke_from_event_loop` to update the UI from the background thread.

use mosaic_cutter::{
    grid, image_loader,
    preview::{self, PreviewLayout},
    state::{Session, SourceImage},
};
use log::debug;
use slint::{ComponentHandle, ModelRc, VecModel};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Loads an image in a background thread, makes it the session source and
/// renders its preview.
///
/// On failure the previous source stays loaded and the error is shown.
pub fn load_and_display_image(
    ui: slint::Weak<crate::AppWindow>,
    path: PathBuf,
    error_prefix: String,
    session: Arc<Mutex<Session>>,
) {
    rayon::spawn(move || {
        let result = image_loader::load_source_image(&path);

        let _ = slint::invoke_from_event_loop(move || {
            let Some(ui) = ui.upgrade() else {
                return;
            };
            match result {
                Ok(pixels) => {
                    let (width, height) = pixels.dimensions();
                    crate::ui::set_source_info(&ui, &path, width, height);
                    if let Ok(mut session) = session.lock() {
                        session.set_source(SourceImage::new(path, pixels));
                    }
                    refresh_preview(&ui, session);
                }
                Err(e) => crate::ui::set_error_with_prefix(&ui, &error_prefix, e.to_string()),
            }
        });
    });
}

/// Fits the source into the current viewport and re-renders the preview if
/// its size changed; otherwise only the grid overlay is redrawn.
pub fn refresh_preview(ui: &crate::AppWindow, session: Arc<Mutex<Session>>) {
    let (source, current_layout) = match session.lock() {
        Ok(session) => (session.source(), session.layout()),
        Err(_) => return,
    };
    let Some(source) = source else {
        return;
    };

    let (width, height) = source.dimensions();
    let layout = preview::fit_preview(
        width,
        height,
        ui.get_viewport_width(),
        ui.get_viewport_height(),
    );

    if current_layout == Some(layout) {
        redraw_grid(ui, &session);
        return;
    }

    let generation = match session.lock() {
        Ok(mut session) => session.begin_preview(),
        Err(_) => return,
    };
    debug!(
        "Rendering preview {} at {}x{} (scale {:.3})",
        generation, layout.preview_width, layout.preview_height, layout.scale
    );

    let ui_handle = ui.as_weak();
    rayon::spawn(move || {
        let pixels = image_loader::render_preview(&source.pixels, &layout);

        let _ = slint::invoke_from_event_loop(move || {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };
            let current = session
                .lock()
                .map(|mut session| session.finish_preview(generation, layout))
                .unwrap_or(false);
            if !current {
                return;
            }
            show_preview(&ui, &pixels, &layout);
            redraw_grid(&ui, &session);
        });
    });
}

fn show_preview(ui: &crate::AppWindow, pixels: &image::RgbImage, layout: &PreviewLayout) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_preview_image(image_loader::create_slint_image(pixels));
    view_state.set_preview_width(layout.preview_width as f32);
    view_state.set_preview_height(layout.preview_height as f32);
    view_state.set_image_loaded(true);
}

/// Recomputes the overlay lines and tile label from the current grid controls.
pub fn redraw_grid(ui: &crate::AppWindow, session: &Arc<Mutex<Session>>) {
    let Some(layout) = session.lock().ok().and_then(|session| session.layout()) else {
        return;
    };

    let grid_state = ui.global::<crate::GridState>();
    let (rows, cols) = (grid_state.get_rows(), grid_state.get_cols());
    let view_state = ui.global::<crate::ViewState>();

    let (lines, label) = match preview::grid_overlay(&layout, rows, cols) {
        Ok(lines) => (lines, preview::grid_label(rows, cols)),
        Err(e) => (Vec::new(), e.to_string()),
    };

    let lines: Vec<crate::OverlayLine> = lines
        .into_iter()
        .map(|line| crate::OverlayLine {
            x: line.x,
            y: line.y,
            width: line.width,
            height: line.height,
        })
        .collect();

    view_state.set_grid_lines(ModelRc::new(VecModel::from(lines)));
    view_state.set_grid_label(label.into());
}

/// Describes the tile under the pointer, `(x, y)` being preview coordinates.
pub fn describe_hover(ui: &crate::AppWindow, session: &Arc<Mutex<Session>>, x: f32, y: f32) {
    let Some(layout) = session.lock().ok().and_then(|session| session.layout()) else {
        return;
    };
    let grid_state = ui.global::<crate::GridState>();
    let info = hover_text(
        &layout,
        grid_state.get_rows(),
        grid_state.get_cols(),
        grid_state.get_trim(),
        x,
        y,
    );
    ui.global::<crate::ViewState>().set_hover_info(info.into());
}

fn hover_text(layout: &PreviewLayout, rows: i32, cols: i32, trim: i32, x: f32, y: f32) -> String {
    let (rows, cols) = (rows.max(1) as u32, cols.max(1) as u32);
    let (sx, sy) = layout.to_source(x, y);
    let (w, h) = (layout.source_width, layout.source_height);

    let Some(index) = grid::tile_at(w, h, rows, cols, sx, sy) else {
        return format!("x {} y {}", sx, sy);
    };
    let Some((row, col)) = grid::tile_position(index, cols) else {
        return format!("x {} y {}", sx, sy);
    };
    let rects = match grid::partition(w, h, rows, cols) {
        Ok(rects) => rects,
        Err(_) => return format!("x {} y {}", sx, sy),
    };
    let cut = rects[index - 1].inset(trim.max(0) as u32);

    format!(
        "x {} y {} · tile {} (row {}, col {}) · {}×{} px",
        sx,
        sy,
        index,
        row + 1,
        col + 1,
        cut.width(),
        cut.height()
    )
}
