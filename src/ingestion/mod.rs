//! Upload dispatch and extraction.
//!
//! Most callers should use [`preview_file`] (from [`unified`]) which:
//!
//! - dispatches on the file name's extension ([`UploadFormat`])
//! - decodes the file with the matching [`TabularExtractor`]
//! - keeps only a bounded [`crate::types::PreviewTable`]
//! - optionally reports success/failure/alerts to a [`PreviewObserver`]
//!
//! Format-specific strategies live under:
//! - [`csv`]
//! - `excel` (feature `excel`)

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod extract;
pub mod format;
pub mod observability;
pub mod unified;

#[cfg(feature = "excel")]
pub use excel::SpreadsheetExtractor;
pub use self::csv::DelimitedTextExtractor;
pub use extract::{ExtractSettings, Extraction, TabularExtractor};
pub use format::{UploadFormat, UploadedFile};
pub use observability::{
    CompositeObserver, PreviewContext, PreviewObserver, PreviewSeverity, PreviewStats, StdErrObserver,
    TracingObserver,
};
pub use unified::{PreviewOptions, extract_file, preview_file, preview_from_path};
