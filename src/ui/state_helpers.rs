//! Helper functions to set related ViewState and GridState properties together.

use mosaic_cutter::error::Result;
use mosaic_cutter::export::GridConfig;
use log::{error, info};
use slint::ComponentHandle;
use std::path::Path;

/// Sets the source information shown under the "Choose image" button.
pub fn set_source_info(ui: &crate::AppWindow, path: &Path, width: u32, height: u32) {
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_image_path(format!("{} ({}×{})", path.display(), width, height).into());
    view_state.set_error_message("".into());
}

/// Sets an error message in the UI with a prefix.
///
/// Logs the error and updates the ViewState error-message property.
pub fn set_error_with_prefix(ui: &crate::AppWindow, prefix: &str, error: String) {
    let error_message = format!("{}: {}", prefix, error);
    error!("{}", error_message);
    ui.global::<crate::ViewState>()
        .set_error_message(error_message.into());
}

/// Shows a status line and clears any previous error.
pub fn set_status(ui: &crate::AppWindow, message: String) {
    info!("{}", message);
    let view_state = ui.global::<crate::ViewState>();
    view_state.set_status_message(message.into());
    view_state.set_error_message("".into());
}

/// Toggles the exporting state of the controls.
pub fn set_export_in_progress(ui: &crate::AppWindow, in_progress: bool) {
    ui.global::<crate::GridState>()
        .set_export_in_progress(in_progress);
}

/// Reads and validates the grid and output parameters from the controls.
pub fn read_grid_config(ui: &crate::AppWindow) -> Result<GridConfig> {
    let grid_state = ui.global::<crate::GridState>();
    GridConfig::from_input(
        grid_state.get_rows(),
        grid_state.get_cols(),
        grid_state.get_trim(),
        &grid_state.get_prefix(),
        &grid_state.get_format(),
    )
}
