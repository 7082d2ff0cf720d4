//! Unified preview entrypoint.
//!
//! Most callers should use [`preview_file`], which dispatches an [`UploadedFile`] on its
//! extension and returns a bounded [`PreviewTable`].
//!
//! - If [`PreviewOptions::row_budget`] is `None`, each format uses its
//!   [`UploadFormat::default_budget`].
//! - If a [`PreviewObserver`] is provided, success/failure/alerts are reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::PreviewResult;
use crate::types::{PreviewTable, RowBudget};

use super::extract::{ExtractSettings, Extraction};
use super::format::{UploadFormat, UploadedFile};
use super::observability::{
    PreviewContext, PreviewObserver, PreviewSeverity, PreviewStats, report_failure,
};

/// Options controlling preview behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct PreviewOptions {
    /// If `None`, use the format's default budget.
    pub row_budget: Option<RowBudget>,
    /// Field delimiter for delimited text.
    pub delimiter: u8,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn PreviewObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: PreviewSeverity,
}

impl fmt::Debug for PreviewOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewOptions")
            .field("row_budget", &self.row_budget)
            .field("delimiter", &(self.delimiter as char))
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            row_budget: None,
            delimiter: b',',
            observer: None,
            alert_at_or_above: PreviewSeverity::Warning,
        }
    }
}

impl PreviewOptions {
    /// Settings for one extraction of `format`.
    pub fn settings_for(&self, format: UploadFormat) -> ExtractSettings {
        ExtractSettings {
            budget: self.row_budget.unwrap_or_else(|| format.default_budget()),
            delimiter: self.delimiter,
        }
    }

    pub(crate) fn report_success(&self, ctx: &PreviewContext, table: &PreviewTable) {
        if let Some(obs) = self.observer.as_ref() {
            obs.on_success(
                ctx,
                PreviewStats {
                    rows: table.row_count(),
                    columns: table.column_count(),
                },
            );
        }
    }

    pub(crate) fn report_failure(&self, ctx: &PreviewContext, error: &crate::PreviewError) {
        report_failure(self.observer.as_ref(), self.alert_at_or_above, ctx, error);
    }
}

/// Dispatch and extract without touching any observer.
///
/// Returns the raw [`Extraction`], so a partially-parsed CSV can still be shown.
pub fn extract_file(file: &UploadedFile, options: &PreviewOptions) -> PreviewResult<Extraction> {
    let format = file.format()?;
    Ok(format
        .extractor()
        .extract(&file.bytes, options.settings_for(format)))
}

/// Unified preview entry point.
///
/// Unsupported extensions are rejected before anything is decoded. Any extraction error
/// (including a malformed CSV row after some good ones) is returned as `Err`; use
/// [`crate::session::PreviewSession`] to keep partial rows instead.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column stats
/// - `on_failure` on failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```rust
/// use rhombus_preview::ingestion::{preview_file, PreviewOptions, UploadedFile};
///
/// # fn main() -> Result<(), rhombus_preview::PreviewError> {
/// let file = UploadedFile::new("people.csv", "name,age\nAlice,30\nBob,25\n");
/// let table = preview_file(&file, &PreviewOptions::default())?;
/// assert_eq!(table.headers, vec!["name", "age"]);
/// assert_eq!(table.row_count(), 2);
/// # Ok(())
/// # }
/// ```
pub fn preview_file(file: &UploadedFile, options: &PreviewOptions) -> PreviewResult<PreviewTable> {
    let mut ctx = PreviewContext {
        file_name: file.name.clone(),
        format: None,
        generation: None,
    };

    let result = file.format().and_then(|format| {
        ctx.format = Some(format);
        format
            .extractor()
            .extract(&file.bytes, options.settings_for(format))
            .into_result()
    });

    match &result {
        Ok(table) => options.report_success(&ctx, table),
        Err(e) => options.report_failure(&ctx, e),
    }
    result
}

/// Read `path` from disk and preview it with [`preview_file`].
///
/// ```no_run
/// use rhombus_preview::ingestion::{preview_from_path, PreviewOptions};
///
/// # fn main() -> Result<(), rhombus_preview::PreviewError> {
/// let table = preview_from_path("workbook.xlsx", &PreviewOptions::default())?;
/// println!("rows={}", table.row_count());
/// # Ok(())
/// # }
/// ```
pub fn preview_from_path(
    path: impl AsRef<Path>,
    options: &PreviewOptions,
) -> PreviewResult<PreviewTable> {
    let file = read_upload(path.as_ref(), options)?;
    preview_file(&file, options)
}

/// Read an upload from disk, reporting an I/O failure to the observer.
pub(crate) fn read_upload(path: &Path, options: &PreviewOptions) -> PreviewResult<UploadedFile> {
    UploadedFile::from_path(path).inspect_err(|e| {
        let ctx = PreviewContext {
            file_name: path.display().to_string(),
            format: path
                .extension()
                .and_then(|s| s.to_str())
                .and_then(UploadFormat::from_extension),
            generation: None,
        };
        options.report_failure(&ctx, e);
    })
}
