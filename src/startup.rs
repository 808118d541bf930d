use slint::ComponentHandle;
use std::path::PathBuf;

use mosaic_cutter::state::AppState;

fn startup_image_from_args() -> Option<PathBuf> {
    image_from_args(std::env::args_os().skip(1).map(PathBuf::from))
}

/// First argument that is not a flag and names a supported image.
fn image_from_args(args: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    args.into_iter()
        .filter(|path| !path.to_string_lossy().starts_with('-'))
        .find(|path| mosaic_cutter::file_utils::is_supported_image(path))
}

/// Opens images dropped onto the window.
fn setup_drop_hook(app: &crate::AppWindow, app_state: &AppState) {
    use i_slint_backend_winit::WinitWindowAccessor;
    use i_slint_backend_winit::{EventResult, winit::event::WindowEvent};

    let ui_handle = app.as_weak();
    let session = app_state.session.clone();

    app.window().on_winit_window_event(move |_window, event| {
        if let WindowEvent::DroppedFile(path) = event {
            if mosaic_cutter::file_utils::is_supported_image(path) {
                crate::ui::image_display::load_and_display_image(
                    ui_handle.clone(),
                    path.clone(),
                    "Failed to load dropped image".to_string(),
                    session.clone(),
                );
            } else {
                log::warn!("Ignoring dropped file with unsupported type: {:?}", path);
            }
        }

        EventResult::Propagate
    });
}

pub fn configure_startup_opening(app: &crate::AppWindow, app_state: &AppState) {
    setup_drop_hook(app, app_state);

    if let Some(path) = startup_image_from_args() {
        crate::ui::image_display::load_and_display_image(
            app.as_weak(),
            path,
            "Failed to load startup image".to_string(),
            app_state.session.clone(),
        );
    }
}
