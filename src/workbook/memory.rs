//! In-memory workbook for tests and fixtures.

use super::{ExtractError, SourceRow, WorkbookSource};
use crate::domain::Cell;

/// Workbook whose sheets are held in memory, in order.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<Vec<Vec<Cell>>>,
}

impl MemoryWorkbook {
    /// Create a workbook with no sheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sheet given as rows of cells, header first.
    pub fn with_sheet(mut self, rows: Vec<Vec<Cell>>) -> Self {
        self.sheets.push(rows);
        self
    }
}

impl WorkbookSource for MemoryWorkbook {
    fn read_sheet(&mut self, index: usize) -> Result<Vec<SourceRow>, ExtractError> {
        let rows = index
            .checked_sub(1)
            .and_then(|i| self.sheets.get(i))
            .ok_or(ExtractError::MissingSheet {
                index,
                available: self.sheets.len(),
            })?;

        Ok(rows
            .iter()
            .enumerate()
            .filter(|(_, cells)| !cells.iter().all(Cell::is_blank))
            .map(|(i, cells)| SourceRow::new(i + 1, cells.clone()))
            .collect())
    }
}
