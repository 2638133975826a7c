//! Domain types for the content workbook.
//!
//! This module provides:
//! - Untyped cell values as read from a worksheet
//! - The five fixed worksheets and their target tables
//! - Typed per-sheet records with positional validation
//! - Scripture tag normalization

pub mod cell;
pub mod records;
pub mod sheet;
pub mod tags;

pub use cell::Cell;
pub use records::{
    Hagiography, MagisterialText, Prayer, RowError, ScriptureReading, SheetRecord, Station,
};
pub use sheet::Sheet;
pub use tags::normalize_tags;
