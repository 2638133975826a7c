pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod orchestration;
pub mod workbook;

pub use config::{Config, FailurePolicy};
pub use db::{create_template, Repository};
pub use domain::{Cell, Sheet};
pub use error::BuildError;
pub use orchestration::{run, LoadReport, RunSummary};
pub use workbook::{MemoryWorkbook, WorkbookSource, XlsxWorkbook};
