//! Format dispatch by file-name extension.

use std::fmt;
use std::path::Path;

use crate::error::{PreviewError, PreviewResult};
use crate::types::{PREVIEW_ROWS, RowBudget};

use super::extract::TabularExtractor;

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadFormat {
    /// Comma-separated values with a header row (`.csv`).
    DelimitedText,
    /// Binary workbook (`.xls`, `.xlsx`).
    Spreadsheet,
}

impl UploadFormat {
    /// Parse an upload format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::DelimitedText),
            "xls" | "xlsx" => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    /// Resolve the format of a file name, or reject it.
    pub fn from_file_name(name: &str) -> PreviewResult<Self> {
        let ext = extension_of(name);
        Self::from_extension(&ext).ok_or_else(|| PreviewError::UnsupportedFileType {
            name: name.to_owned(),
            extension: ext,
        })
    }

    /// Row budget used when [`super::PreviewOptions::row_budget`] is not set.
    ///
    /// Delimited text keeps five records; spreadsheets keep five rows of the array-of-arrays
    /// form, header included.
    pub fn default_budget(self) -> RowBudget {
        match self {
            Self::DelimitedText => RowBudget::DataRows(PREVIEW_ROWS),
            Self::Spreadsheet => RowBudget::IncludingHeader(PREVIEW_ROWS),
        }
    }

    /// The extraction strategy for this format.
    pub fn extractor(self) -> &'static dyn TabularExtractor {
        match self {
            Self::DelimitedText => &super::csv::DelimitedTextExtractor,
            #[cfg(feature = "excel")]
            Self::Spreadsheet => &super::excel::SpreadsheetExtractor,
            #[cfg(not(feature = "excel"))]
            Self::Spreadsheet => &super::extract::SpreadsheetUnavailable,
        }
    }

    /// Short lowercase name used in logs and messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::DelimitedText => "csv",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

impl fmt::Display for UploadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Text after the final `.`, lower-cased. A name without a dot is its own extension.
fn extension_of(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_ascii_lowercase()
}

/// A user-selected file: a name plus its bytes.
///
/// Only the name's extension is consulted for dispatch. The file is consumed by the preview
/// pipeline and not retained afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk; the file name (without directories) becomes the upload name.
    pub fn from_path(path: impl AsRef<Path>) -> PreviewResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Dispatch on the file name's extension.
    pub fn format(&self) -> PreviewResult<UploadFormat> {
        UploadFormat::from_file_name(&self.name)
    }
}
