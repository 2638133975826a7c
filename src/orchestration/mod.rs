//! The extract-transform-load job.
//!
//! - `loader` clears and refills the content tables from extracted rows
//! - `pipeline` runs provisioning, extraction and loading in order

pub mod loader;
pub mod pipeline;

pub use loader::{FailureStage, LoadError, LoadReport, Loader, RowFailure};
pub use pipeline::{build_with, run, RunSummary};
