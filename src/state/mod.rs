//! State management for the mosaic cutter application.

use std::sync::{Arc, Mutex};

pub mod session;

pub use session::{Session, SourceImage};

/// Application-wide state container.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
        }
    }
}
