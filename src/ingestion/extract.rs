//! The common "extract rows" capability shared by every upload format.

use crate::error::{PreviewError, PreviewResult};
use crate::types::{PreviewTable, RowBudget};

/// Per-extraction settings resolved from [`super::PreviewOptions`] and the upload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractSettings {
    /// How many rows to keep.
    pub budget: RowBudget,
    /// Field delimiter for delimited text.
    pub delimiter: u8,
}

/// Outcome of one extraction.
///
/// `table` holds whatever was decoded before `error` (if any) occurred, so a malformed CSV
/// row still leaves the rows before it available for display.
#[derive(Debug)]
pub struct Extraction {
    pub table: PreviewTable,
    pub error: Option<PreviewError>,
}

impl Extraction {
    /// Every row in the window decoded cleanly.
    pub fn complete(table: PreviewTable) -> Self {
        Self { table, error: None }
    }

    /// Nothing usable was decoded.
    pub fn failed(error: PreviewError) -> Self {
        Self {
            table: PreviewTable::empty(),
            error: Some(error),
        }
    }

    /// Rows decoded before `error` stopped the reader.
    pub fn partial(table: PreviewTable, error: PreviewError) -> Self {
        Self {
            table,
            error: Some(error),
        }
    }

    /// `true` when decoding reached the end of the preview window without error.
    pub fn is_complete(&self) -> bool {
        self.error.is_none()
    }

    /// Strict view: any error wins and partial rows are dropped.
    pub fn into_result(self) -> PreviewResult<PreviewTable> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.table),
        }
    }
}

/// Converts one file format's bytes into a bounded [`PreviewTable`].
pub trait TabularExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8], settings: ExtractSettings) -> Extraction;
}

/// Stand-in strategy used when spreadsheet support is compiled out.
#[cfg(not(feature = "excel"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetUnavailable;

#[cfg(not(feature = "excel"))]
impl TabularExtractor for SpreadsheetUnavailable {
    fn extract(&self, _bytes: &[u8], _settings: ExtractSettings) -> Extraction {
        Extraction::failed(PreviewError::FeatureDisabled {
            kind: "spreadsheet",
            feature: "excel",
        })
    }
}
