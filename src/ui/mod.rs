//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - `slint::spawn_local`: file and folder dialogs, which must run on the main thread
//! - `rayon::spawn`: image decoding, preview downscaling and tile export
//! - `slint::invoke_from_event_loop`: returning results from rayon to the UI thread

pub mod handlers;
pub mod image_display;
mod state_helpers;

pub use handlers::setup_handlers;
pub use state_helpers::*;
