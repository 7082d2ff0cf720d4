//! Core data model types for previews.
//!
//! Both extraction strategies build the same normalized [`PreviewTable`]: a header list plus
//! row-major cells, with the header kept out of `rows`.

use std::fmt;

use serde::Serialize;

/// Number of rows shown in a preview.
pub const PREVIEW_ROWS: usize = 5;

/// A single scalar cell.
///
/// Delimited-text cells are always [`CellValue::Text`]. Spreadsheet cells keep their native
/// type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Blank spreadsheet cell.
    Empty,
    /// UTF-8 string.
    Text(String),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean.
    Bool(bool),
    /// Date or date-time as ISO 8601 (`2023-03-15`, `2023-03-15T12:00:00`).
    DateTime(String),
    /// Spreadsheet error cell (`#DIV/0!`, ...).
    Error(String),
}

impl CellValue {
    /// Convenience constructor for text cells.
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    /// Returns the string payload of a text cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) | Self::DateTime(s) | Self::Error(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{v}")
                }
            }
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// How many rows a preview keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowBudget {
    /// Keep `n` data rows; the header does not count.
    DataRows(usize),
    /// Keep `n` rows counting the header as row 0, i.e. at most `n - 1` data rows.
    IncludingHeader(usize),
}

impl RowBudget {
    /// Maximum number of data rows (header excluded) this budget allows.
    pub fn data_rows(self) -> usize {
        match self {
            Self::DataRows(n) => n,
            Self::IncludingHeader(n) => n.saturating_sub(1),
        }
    }
}

/// Normalized preview of an uploaded table.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PreviewTable {
    /// Column headers, in file order.
    pub headers: Vec<String>,
    /// Data rows (header excluded); each row has `headers.len()` cells.
    pub rows: Vec<Vec<CellValue>>,
}

impl PreviewTable {
    /// Create a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// The table shown before any file has been parsed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `true` when there is nothing to draw (no headers and no rows).
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Keyed view of data row `idx`.
    pub fn record(&self, idx: usize) -> Option<Record<'_>> {
        self.rows.get(idx).map(|cells| Record {
            headers: &self.headers,
            cells,
        })
    }

    /// Keyed views of all data rows.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record {
            headers: &self.headers,
            cells,
        })
    }

    /// Array-of-arrays rendering with the header at index 0.
    pub fn row_major(&self) -> Vec<Vec<String>> {
        if self.is_empty() {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.headers.clone());
        out.extend(
            self.rows
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect()),
        );
        out
    }
}

/// A data row viewed as a mapping from column header to cell.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Record<'a> {
    /// Cell under `header`, if the column exists.
    ///
    /// With duplicate headers the last such column wins, as in a keyed row object.
    pub fn get(&self, header: &str) -> Option<&'a CellValue> {
        self.headers
            .iter()
            .rposition(|h| h == header)
            .and_then(|idx| self.cells.get(idx))
    }

    /// Column headers in order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.headers.iter().map(String::as_str)
    }

    /// `(header, cell)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> {
        self.headers.iter().map(String::as_str).zip(self.cells.iter())
    }
}
