//! Typed record shapes for each worksheet.
//!
//! Rows are positional: every record parses a fixed column layout and
//! rejects rows that carry data beyond it. Missing trailing cells are read as
//! blank, since a worksheet whose last column is empty throughout has a
//! narrower used range.

use super::{normalize_tags, Cell, Sheet};
use thiserror::Error;

/// Why a single worksheet row could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("expected at most {expected} columns, found data in column {found}")]
    Arity { expected: usize, found: usize },
    #[error("column {column} must be an integer, got {value}")]
    Integer { column: &'static str, value: String },
}

/// A record parsed from one positional worksheet row.
pub trait SheetRecord: Sized {
    /// Worksheet the record comes from.
    const SHEET: Sheet;
    /// Number of positional columns the record consumes.
    const COLUMNS: usize;

    /// Parse the record from a row whose arity has already been checked.
    fn parse(cells: &Columns<'_>) -> Result<Self, RowError>;

    /// Check arity and parse the record from a raw row.
    fn from_cells(cells: &[Cell]) -> Result<Self, RowError> {
        let columns = Columns::new(cells, Self::COLUMNS)?;
        Self::parse(&columns)
    }
}

/// Positional view over a row, padded with blanks up to the expected width.
pub struct Columns<'a> {
    cells: &'a [Cell],
}

static EMPTY: Cell = Cell::Empty;

impl<'a> Columns<'a> {
    fn new(cells: &'a [Cell], expected: usize) -> Result<Self, RowError> {
        if let Some(last) = cells.iter().rposition(|c| !c.is_blank()) {
            if last >= expected {
                return Err(RowError::Arity {
                    expected,
                    found: last + 1,
                });
            }
        }
        Ok(Self { cells })
    }

    fn get(&self, idx: usize) -> &Cell {
        self.cells.get(idx).unwrap_or(&EMPTY)
    }

    /// Text column, `None` when blank.
    fn text(&self, idx: usize) -> Option<String> {
        self.get(idx).as_text()
    }

    /// Text column, empty string when blank, zero or false.
    fn text_or_empty(&self, idx: usize) -> String {
        let cell = self.get(idx);
        if cell.is_falsy() {
            return String::new();
        }
        cell.as_text().unwrap_or_default()
    }

    /// Integer column, `None` when blank. Non-blank cells must be integers.
    fn int(&self, idx: usize, column: &'static str) -> Result<Option<i64>, RowError> {
        let cell = self.get(idx);
        if cell.is_blank() {
            return Ok(None);
        }
        cell.as_int().map(Some).ok_or_else(|| RowError::Integer {
            column,
            value: cell.to_string(),
        })
    }
}

/// A scripture reading with its normalized tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptureReading {
    pub book: Option<String>,
    pub chapter: Option<i64>,
    pub verse_start: Option<i64>,
    pub verse_end: Option<i64>,
    pub title: Option<String>,
    pub quote: Option<String>,
    pub comment: Option<String>,
    pub tags: Vec<String>,
}

impl SheetRecord for ScriptureReading {
    const SHEET: Sheet = Sheet::Scripture;
    const COLUMNS: usize = 9;

    fn parse(c: &Columns<'_>) -> Result<Self, RowError> {
        // Column 5 is a display column that is not persisted.
        Ok(Self {
            book: c.text(0),
            chapter: c.int(1, "chapter")?,
            verse_start: c.int(2, "verse0")?,
            verse_end: c.int(3, "verse1")?,
            title: c.text(4),
            tags: normalize_tags(c.get(6)),
            quote: c.text(7),
            comment: c.text(8),
        })
    }
}

/// A station of the way of the cross.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    pub number: Option<i64>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub caption: Option<String>,
    pub comment: Option<String>,
    pub author: Option<String>,
    pub copyright: Option<String>,
}

impl SheetRecord for Station {
    const SHEET: Sheet = Sheet::WayOfCross;
    const COLUMNS: usize = 7;

    fn parse(c: &Columns<'_>) -> Result<Self, RowError> {
        Ok(Self {
            number: c.int(0, "number")?,
            title: c.text(1),
            image: c.text(2),
            caption: c.text(3),
            comment: c.text(4),
            author: c.text(5),
            copyright: c.text(6),
        })
    }
}

/// A papal or magisterial text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagisterialText {
    pub author: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub text: Option<String>,
}

impl SheetRecord for MagisterialText {
    const SHEET: Sheet = Sheet::Magisterial;
    const COLUMNS: usize = 4;

    fn parse(c: &Columns<'_>) -> Result<Self, RowError> {
        Ok(Self {
            author: c.text(0),
            title: c.text(1),
            date: c.text(2),
            text: c.text(3),
        })
    }
}

/// The life of a saint. Blank, zero and false cells are stored as empty
/// strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hagiography {
    pub title: String,
    pub subtitle: String,
    pub text: String,
    pub copyright: String,
}

impl SheetRecord for Hagiography {
    const SHEET: Sheet = Sheet::Hagiography;
    const COLUMNS: usize = 4;

    fn parse(c: &Columns<'_>) -> Result<Self, RowError> {
        Ok(Self {
            title: c.text_or_empty(0),
            subtitle: c.text_or_empty(1),
            text: c.text_or_empty(2),
            copyright: c.text_or_empty(3),
        })
    }
}

/// A prayer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prayer {
    pub category: Option<String>,
    pub title: Option<String>,
    pub text: Option<String>,
}

impl SheetRecord for Prayer {
    const SHEET: Sheet = Sheet::Prayers;
    const COLUMNS: usize = 3;

    fn parse(c: &Columns<'_>) -> Result<Self, RowError> {
        Ok(Self {
            category: c.text(0),
            title: c.text(1),
            text: c.text(2),
        })
    }
}
