//! Untyped spreadsheet cell values and their conversions.

/// A single cell as read from a worksheet.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    /// Build a text cell.
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// True for blank cells, zero and `false`.
    pub fn is_falsy(&self) -> bool {
        match self {
            Cell::Int(i) => *i == 0,
            Cell::Float(f) => *f == 0.0 || f.is_nan(),
            Cell::Bool(b) => !b,
            other => other.is_blank(),
        }
    }

    /// Render the cell as text, or `None` when it is blank.
    ///
    /// Whole-number floats render without a decimal point so that a chapter
    /// typed as `3` in the workbook does not become `"3.0"`.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) if s.trim().is_empty() => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(render_float(*f)),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }

    /// Interpret the cell as an integer.
    ///
    /// Accepts integer cells, whole-number floats and numeric text.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            Cell::Text(s) => {
                let trimmed = s.trim();
                trimmed.parse::<i64>().ok().or_else(|| {
                    trimmed
                        .parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0 && f.is_finite())
                        .map(|f| f as i64)
                })
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Empty => write!(f, "<empty>"),
            Cell::Text(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other.as_text().unwrap_or_default()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<i64> for Cell {
    fn from(i: i64) -> Self {
        Cell::Int(i)
    }
}

impl From<f64> for Cell {
    fn from(f: f64) -> Self {
        Cell::Float(f)
    }
}

fn render_float(f: f64) -> String {
    if f.fract() == 0.0 && f.is_finite() && f.abs() < i64::MAX as f64 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

/// Convert a spreadsheet date serial (1900 date system) to ISO text.
///
/// Serials with no time part render as `YYYY-MM-DD`, the rest as
/// `YYYY-MM-DD HH:MM:SS`.
pub fn date_serial_to_text(serial: f64) -> Option<String> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = chrono::NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    let dt = epoch.checked_add_signed(chrono::Duration::milliseconds(millis))?;
    if millis % 86_400_000 == 0 {
        Some(dt.format("%Y-%m-%d").to_string())
    } else {
        Some(dt.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_renders_whole_floats_without_fraction() {
        assert_eq!(Cell::Float(3.0).as_text().as_deref(), Some("3"));
        assert_eq!(Cell::Float(2.5).as_text().as_deref(), Some("2.5"));
        assert_eq!(Cell::Int(16).as_text().as_deref(), Some("16"));
    }

    #[test]
    fn test_blank_text_is_none() {
        assert_eq!(Cell::Empty.as_text(), None);
        assert_eq!(Cell::text("   ").as_text(), None);
        assert!(Cell::text(" \t").is_blank());
        assert!(!Cell::Int(0).is_blank());
    }

    #[test]
    fn test_is_falsy() {
        assert!(Cell::Empty.is_falsy());
        assert!(Cell::Int(0).is_falsy());
        assert!(Cell::Float(0.0).is_falsy());
        assert!(Cell::Bool(false).is_falsy());
        assert!(!Cell::Int(7).is_falsy());
        assert!(!Cell::text("0").is_falsy());
    }

    #[test]
    fn test_as_int_accepts_numeric_text_and_whole_floats() {
        assert_eq!(Cell::text(" 16 ").as_int(), Some(16));
        assert_eq!(Cell::text("3.0").as_int(), Some(3));
        assert_eq!(Cell::Float(14.0).as_int(), Some(14));
        assert_eq!(Cell::Int(7).as_int(), Some(7));
    }

    #[test]
    fn test_as_int_rejects_non_integers() {
        assert_eq!(Cell::Float(1.5).as_int(), None);
        assert_eq!(Cell::text("three").as_int(), None);
        assert_eq!(Cell::Empty.as_int(), None);
        assert_eq!(Cell::Bool(true).as_int(), None);
    }

    #[test]
    fn test_date_serial_to_text() {
        // 2013-03-13 is serial 41346 in the 1900 date system.
        assert_eq!(date_serial_to_text(41346.0).as_deref(), Some("2013-03-13"));
        assert_eq!(
            date_serial_to_text(41346.5).as_deref(),
            Some("2013-03-13 12:00:00")
        );
        assert_eq!(date_serial_to_text(-1.0), None);
    }
}
