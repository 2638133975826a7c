//! Worksheet extraction from the source workbook.
//!
//! Extraction is all-or-nothing: if the workbook or any of the five sheets
//! cannot be read, no rows are returned and the run must stop before the
//! database is touched.

use crate::domain::{Cell, Sheet};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

pub mod memory;
pub mod xlsx;

pub use memory::MemoryWorkbook;
pub use xlsx::XlsxWorkbook;

/// A source of worksheets addressed by 1-based position.
pub trait WorkbookSource {
    /// Read every non-empty row of a sheet, header included.
    ///
    /// # Errors
    /// Returns an error if the sheet does not exist or cannot be decoded.
    fn read_sheet(&mut self, index: usize) -> Result<Vec<SourceRow>, ExtractError>;
}

/// One worksheet row and its 1-based row number in the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    pub number: usize,
    pub cells: Vec<Cell>,
}

impl SourceRow {
    pub fn new(number: usize, cells: Vec<Cell>) -> Self {
        Self { number, cells }
    }
}

/// Data rows of all five sheets, headers removed.
#[derive(Debug, Clone, Default)]
pub struct Extracted {
    sheets: BTreeMap<Sheet, Vec<SourceRow>>,
}

impl Extracted {
    /// Data rows of a sheet; empty if the sheet had only a header.
    pub fn rows(&self, sheet: Sheet) -> &[SourceRow] {
        self.sheets.get(&sheet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of data rows across all sheets.
    pub fn total_rows(&self) -> usize {
        self.sheets.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to open workbook {path}: {message}")]
    Open { path: PathBuf, message: String },
    #[error("workbook has no sheet {index} ({available} sheets present)")]
    MissingSheet { index: usize, available: usize },
    #[error("failed to read sheet {index}: {message}")]
    Sheet { index: usize, message: String },
    #[error("sheet {sheet} row {row} column {column}: cell error {error}")]
    Cell {
        sheet: usize,
        row: usize,
        column: usize,
        error: String,
    },
}

/// Read all five sheets, dropping the first row of each as its header.
///
/// # Errors
/// Returns the first extraction error; no partial result is produced.
pub fn extract<W: WorkbookSource>(workbook: &mut W) -> Result<Extracted, ExtractError> {
    let mut sheets = BTreeMap::new();

    for sheet in Sheet::ALL {
        let mut rows = workbook.read_sheet(sheet.index())?;
        if rows.is_empty() {
            warn!(sheet = %sheet, "Sheet is empty, expected at least a header row");
        } else {
            let header = rows.remove(0);
            debug!(sheet = %sheet, header = ?header.cells, "Dropped header row");
        }
        info!(sheet = %sheet, rows = rows.len(), "Extracted sheet");
        sheets.insert(sheet, rows);
    }

    Ok(Extracted { sheets })
}
