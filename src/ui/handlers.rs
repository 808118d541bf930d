//! Event handlers for UI callbacks.
//!
//! Sets up all Logic callbacks (select_image, grid_changed, export_tiles, etc.)
//! using the appropriate threading model for each operation type.

use mosaic_cutter::file_utils;
use mosaic_cutter::services::{ExportOutcome, ExportService};
use mosaic_cutter::state::AppState;
use crate::ui::image_display::{describe_hover, load_and_display_image, redraw_grid, refresh_preview};
use crate::ui::{read_grid_config, set_error_with_prefix, set_export_in_progress, set_status};
use rfd::AsyncFileDialog;
use slint::ComponentHandle;

/// Sets up all UI event handlers for the application.
///
/// Takes the UI handle and shared session state, then registers callbacks for
/// image selection, grid edits, export and cancellation.
pub fn setup_handlers(ui: &crate::AppWindow, state: &AppState) {
    // Image selection handler
    // Uses slint::spawn_local because AsyncFileDialog must run on the main thread
    ui.global::<crate::Logic>().on_select_image({
        let ui_handle = ui.as_weak();
        let session = state.session.clone();
        move || {
            let ui_handle = ui_handle.clone();
            let session = session.clone();
            let _ = slint::spawn_local(async move {
                let Some(file_handle) = AsyncFileDialog::new()
                    .set_title("Choose a mosaic image")
                    .add_filter("Images", &mosaic_cutter::config::SUPPORTED_IMAGE_EXTENSIONS)
                    .add_filter("All files", &["*"])
                    .pick_file()
                    .await
                else {
                    return;
                };

                load_and_display_image(
                    ui_handle,
                    file_handle.path().to_path_buf(),
                    "Failed to load image".to_string(),
                    session,
                );
            });
        }
    });

    // Rows/cols/trim edits redraw the overlay only
    ui.global::<crate::Logic>().on_grid_changed({
        let ui_handle = ui.as_weak();
        let session = state.session.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                redraw_grid(&ui, &session);
            }
        }
    });

    ui.global::<crate::Logic>().on_viewport_resized({
        let ui_handle = ui.as_weak();
        let session = state.session.clone();
        move || {
            if let Some(ui) = ui_handle.upgrade() {
                refresh_preview(&ui, session.clone());
            }
        }
    });

    ui.global::<crate::Logic>().on_preview_hovered({
        let ui_handle = ui.as_weak();
        let session = state.session.clone();
        move |x, y| {
            if let Some(ui) = ui_handle.upgrade() {
                describe_hover(&ui, &session, x, y);
            }
        }
    });

    // Export handler
    // Parameters are validated before the folder dialog so nothing is written on bad input
    ui.global::<crate::Logic>().on_export_tiles({
        let ui_handle = ui.as_weak();
        let session = state.session.clone();
        move || {
            let Some(ui) = ui_handle.upgrade() else {
                return;
            };

            let config = match read_grid_config(&ui) {
                Ok(config) => config,
                Err(e) => {
                    set_error_with_prefix(&ui, "Cannot export", e.to_string());
                    return;
                }
            };

            let Some(source) = session.lock().ok().and_then(|session| session.source()) else {
                set_error_with_prefix(&ui, "Cannot export", "choose an image first".to_string());
                return;
            };

            let (width, height) = source.dimensions();
            if let Err(e) = mosaic_cutter::grid::check_grid(width, height, config.rows, config.cols) {
                set_error_with_prefix(&ui, "Cannot export", e.to_string());
                return;
            }

            let ui_handle = ui_handle.clone();
            let service = ExportService::new(session.clone());
            let _ = slint::spawn_local(async move {
                let mut dialog = AsyncFileDialog::new().set_title("Choose the output folder");
                if let Some(dir) = file_utils::initial_output_dir(&source.path) {
                    dialog = dialog.set_directory(dir);
                }
                let Some(folder) = dialog.pick_folder().await else {
                    return;
                };
                let output_dir = folder.path().to_path_buf();

                let progress_ui = ui_handle.clone();
                let done_ui = ui_handle.clone();
                let done_dir = output_dir.clone();

                let started = service.start(
                    source,
                    output_dir,
                    config,
                    move |written, total| {
                        let ui = progress_ui.clone();
                        let _ = slint::invoke_from_event_loop(move || {
                            if let Some(ui) = ui.upgrade() {
                                ui.global::<crate::ViewState>().set_status_message(
                                    format!("Exporting… {}/{}", written, total).into(),
                                );
                            }
                        });
                    },
                    move |result| {
                        let _ = slint::invoke_from_event_loop(move || {
                            let Some(ui) = done_ui.upgrade() else {
                                return;
                            };
                            set_export_in_progress(&ui, false);
                            match ExportOutcome::from_result(&result, &done_dir) {
                                ExportOutcome::Done(message) | ExportOutcome::Cancelled(message) => {
                                    set_status(&ui, message)
                                }
                                ExportOutcome::Failed(message) => {
                                    set_error_with_prefix(&ui, "Export failed", message)
                                }
                            }
                        });
                    },
                );

                if let Some(ui) = ui_handle.upgrade() {
                    match started {
                        Ok(()) => set_export_in_progress(&ui, true),
                        Err(e) => set_error_with_prefix(&ui, "Cannot export", e.to_string()),
                    }
                }
            });
        }
    });

    ui.global::<crate::Logic>().on_cancel_export({
        let session = state.session.clone();
        move || {
            if ExportService::new(session.clone()).cancel() {
                log::info!("Export cancellation requested");
            }
        }
    });
}
