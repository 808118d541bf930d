//! Service layer for business logic.
//!
//! Separates business logic from UI handlers for better testability and maintainability.

pub mod export_service;

pub use export_service::{ExportOutcome, ExportService};
