use thiserror::Error;

/// Convenience result type for preview operations.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Error type returned by the upload/preview pipeline.
///
/// Shared across the delimited-text and (optional) spreadsheet extractors.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// Underlying I/O error (e.g. the selected file could not be read).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited-text decode error (malformed row, invalid UTF-8, ...).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "excel")]
    /// Workbook decode error (feature-gated behind `excel`).
    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// The file name's extension is not one of `csv`, `xls`, `xlsx`.
    #[error("Unsupported file type '{extension}' ({name}). Please upload a CSV or Excel file.")]
    UnsupportedFileType { name: String, extension: String },

    /// The workbook decoded but has no sheets to preview.
    #[error("workbook has no sheets")]
    EmptyWorkbook,

    /// The format is recognized but support for it was compiled out.
    #[error("{kind} previews not enabled (enable cargo feature '{feature}')")]
    FeatureDisabled {
        kind: &'static str,
        feature: &'static str,
    },
}

/// Convenience result type for pattern submission.
pub type SubmitResult<T> = Result<T, SubmitError>;

/// Error type returned by [`crate::pattern::PatternSubmitter`].
#[derive(Debug, Error)]
pub enum SubmitError {
    #[cfg(feature = "submit")]
    /// Transport-level failure (connection refused, timeout, invalid URL...).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The request body could not be serialized.
    #[error("failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
}
