//! Service for running tile exports off the UI thread.
//!
//! Owns the one-export-at-a-time rule and the cancel flag bookkeeping in the
//! session; the actual cropping and encoding lives in [`crate::export`].

use crate::error::{AppError, Result};
use crate::export::{self, GridConfig};
use crate::state::{Session, SourceImage};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// How a finished export should be presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// All tiles written
    Done(String),
    /// Stopped by the user; informational, not an error
    Cancelled(String),
    /// Stopped by a failure
    Failed(String),
}

impl ExportOutcome {
    /// Classifies the result of an export into `output_dir`.
    pub fn from_result(result: &Result<usize>, output_dir: &Path) -> Self {
        match result {
            Ok(count) => ExportOutcome::Done(format!(
                "{} files exported to: {}",
                count,
                output_dir.display()
            )),
            Err(e @ AppError::Cancelled { .. }) => ExportOutcome::Cancelled(e.to_string()),
            Err(e) => ExportOutcome::Failed(e.to_string()),
        }
    }
}

/// Service for managing tile exports.
#[derive(Clone)]
pub struct ExportService {
    session: Arc<Mutex<Session>>,
}

impl ExportService {
    /// Creates a new export service.
    pub fn new(session: Arc<Mutex<Session>>) -> Self {
        Self { session }
    }

    /// Locks the session, recovering it if a panicking thread poisoned the lock.
    ///
    /// The session only holds plain bookkeeping, so its data stays usable.
    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts exporting `source` into `output_dir` on a rayon worker.
    ///
    /// `on_progress(written, total)` runs after every tile and `on_done` once
    /// with the final result, both on the worker thread. The session is
    /// released for the next export before `on_done` is called. Failures are
    /// not logged here; `on_done` owns reporting them.
    ///
    /// Returns [`AppError::ExportInProgress`] if another export is running.
    pub fn start<P, D>(
        &self,
        source: SourceImage,
        output_dir: PathBuf,
        config: GridConfig,
        on_progress: P,
        on_done: D,
    ) -> Result<()>
    where
        P: FnMut(usize, usize) + Send + 'static,
        D: FnOnce(Result<usize>) + Send + 'static,
    {
        let cancel = self
            .session()
            .begin_export()
            .ok_or(AppError::ExportInProgress)?;

        info!(
            "Exporting {:?} as {}×{} {} tiles (trim {}) to {:?}",
            source.path, config.rows, config.cols, config.format, config.trim, output_dir
        );

        let session = self.session.clone();
        rayon::spawn(move || {
            let result =
                export::export_tiles_with(&source.pixels, &output_dir, &config, &cancel, on_progress);

            session
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .finish_export();
            on_done(result);
        });

        Ok(())
    }

    /// Requests cancellation of the running export, if any.
    pub fn cancel(&self) -> bool {
        self.session().cancel_export()
    }
}
