//! `.xlsx` workbooks read through calamine.

use super::{ExtractError, SourceRow, WorkbookSource};
use crate::domain::cell::{date_serial_to_text, Cell};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// An `.xlsx` workbook on disk.
pub struct XlsxWorkbook {
    workbook: Xlsx<BufReader<File>>,
}

impl XlsxWorkbook {
    /// Open a workbook for reading.
    ///
    /// # Errors
    /// Returns an error if the file is missing or is not a valid `.xlsx`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let workbook: Xlsx<BufReader<File>> = open_workbook(path).map_err(|e: calamine::XlsxError| ExtractError::Open {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(path = %path.display(), sheets = ?workbook.sheet_names(), "Opened workbook");
        Ok(Self { workbook })
    }
}

impl WorkbookSource for XlsxWorkbook {
    fn read_sheet(&mut self, index: usize) -> Result<Vec<SourceRow>, ExtractError> {
        let available = self.workbook.sheet_names().len();
        let range = index
            .checked_sub(1)
            .and_then(|i| self.workbook.worksheet_range_at(i))
            .ok_or(ExtractError::MissingSheet { index, available })?
            .map_err(|e| ExtractError::Sheet {
                index,
                message: e.to_string(),
            })?;

        // The used range starts at the first non-empty cell; keep positions
        // relative to column A and row 1.
        let (first_row, first_col) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or((0, 0));

        let mut rows = Vec::new();
        for (offset, data) in range.rows().enumerate() {
            let number = first_row + offset + 1;
            let mut cells = vec![Cell::Empty; first_col];
            for (col, value) in data.iter().enumerate() {
                let cell = cell_from_data(value).map_err(|error| ExtractError::Cell {
                    sheet: index,
                    row: number,
                    column: first_col + col + 1,
                    error,
                })?;
                cells.push(cell);
            }

            if cells.iter().all(Cell::is_blank) {
                continue;
            }
            rows.push(SourceRow::new(number, cells));
        }

        Ok(rows)
    }
}

/// Convert a calamine value to a cell. Error cells are rejected.
fn cell_from_data(value: &Data) -> Result<Cell, String> {
    Ok(match value {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => {
            let serial = dt.as_f64();
            date_serial_to_text(serial)
                .map(Cell::Text)
                .unwrap_or(Cell::Float(serial))
        }
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => return Err(e.to_string()),
    })
}
