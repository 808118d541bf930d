//! Per-window session: the loaded mosaic, its current preview layout and the
//! running export, if any.

use crate::preview::PreviewLayout;
use image::RgbImage;
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The loaded source mosaic. Pixels are shared read-only with worker threads.
#[derive(Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub pixels: Arc<RgbImage>,
}

impl SourceImage {
    pub fn new(path: PathBuf, pixels: RgbImage) -> Self {
        Self {
            path,
            pixels: Arc::new(pixels),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

#[derive(Default)]
pub struct Session {
    source: Option<SourceImage>,
    layout: Option<PreviewLayout>,
    preview_generation: u64,
    export_cancel: Option<Arc<AtomicBool>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the source image. The previous preview layout no longer applies.
    pub fn set_source(&mut self, source: SourceImage) {
        debug!("Session source set to {:?}", source.path);
        self.source = Some(source);
        self.layout = None;
        self.preview_generation += 1;
    }

    pub fn source(&self) -> Option<SourceImage> {
        self.source.clone()
    }

    pub fn layout(&self) -> Option<PreviewLayout> {
        self.layout
    }

    /// Starts a new preview render and returns its generation number.
    pub fn begin_preview(&mut self) -> u64 {
        self.preview_generation += 1;
        self.preview_generation
    }

    /// Records the layout of a finished render.
    ///
    /// Returns false when a newer render or source has superseded it.
    pub fn finish_preview(&mut self, generation: u64, layout: PreviewLayout) -> bool {
        if generation != self.preview_generation {
            debug!(
                "Dropping stale preview render {} (current {})",
                generation, self.preview_generation
            );
            return false;
        }
        self.layout = Some(layout);
        true
    }

    /// Registers a new export and returns its cancel flag.
    ///
    /// Returns `None` while another export is still running.
    pub fn begin_export(&mut self) -> Option<Arc<AtomicBool>> {
        if self.export_cancel.is_some() {
            warn!("Export already in progress");
            return None;
        }
        let flag = Arc::new(AtomicBool::new(false));
        self.export_cancel = Some(flag.clone());
        Some(flag)
    }

    pub fn finish_export(&mut self) {
        self.export_cancel = None;
    }

    pub fn is_exporting(&self) -> bool {
        self.export_cancel.is_some()
    }

    /// Asks the running export to stop after its current tile.
    pub fn cancel_export(&self) -> bool {
        match &self.export_cancel {
            Some(flag) => {
                flag.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::fit_preview;

    fn source() -> SourceImage {
        SourceImage::new(PathBuf::from("mosaic.png"), RgbImage::new(40, 30))
    }

    #[test]
    fn stale_preview_is_dropped() {
        let mut session = Session::new();
        session.set_source(source());
        let layout = fit_preview(40, 30, 500.0, 500.0);

        let old = session.begin_preview();
        let new = session.begin_preview();
        assert!(!session.finish_preview(old, layout));
        assert!(session.layout().is_none());
        assert!(session.finish_preview(new, layout));
        assert_eq!(session.layout(), Some(layout));
    }

    #[test]
    fn new_source_clears_layout_and_invalidates_renders() {
        let mut session = Session::new();
        session.set_source(source());
        let generation = session.begin_preview();
        session.set_source(source());

        assert!(!session.finish_preview(generation, fit_preview(40, 30, 500.0, 500.0)));
        assert!(session.layout().is_none());
        assert_eq!(session.source().map(|s| s.dimensions()), Some((40, 30)));
    }

    #[test]
    fn one_export_at_a_time() {
        let mut session = Session::new();
        assert!(!session.cancel_export());

        let flag = session.begin_export().unwrap();
        assert!(session.is_exporting());
        assert!(session.begin_export().is_none());

        assert!(session.cancel_export());
        assert!(flag.load(Ordering::Relaxed));

        session.finish_export();
        assert!(!session.is_exporting());
        assert!(session.begin_export().is_some());
    }
}
