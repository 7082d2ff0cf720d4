use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::PreviewError;

use super::format::UploadFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreviewSeverity {
    /// Informational event.
    Info,
    /// The upload was refused (e.g. unsupported file type); nothing was decoded.
    Warning,
    /// Decoding failed.
    Error,
    /// Critical error (typically I/O).
    Critical,
}

impl PreviewSeverity {
    /// Classify a pipeline error.
    pub fn for_error(e: &PreviewError) -> Self {
        match e {
            PreviewError::Io(_) => Self::Critical,
            PreviewError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            #[cfg(feature = "excel")]
            PreviewError::Spreadsheet(_) => Self::Error,
            PreviewError::UnsupportedFileType { .. } => Self::Warning,
            PreviewError::EmptyWorkbook => Self::Error,
            PreviewError::FeatureDisabled { .. } => Self::Error,
        }
    }
}

/// Context about one upload.
#[derive(Debug, Clone)]
pub struct PreviewContext {
    /// Name of the uploaded file.
    pub file_name: String,
    /// Resolved format; `None` when dispatch rejected the file.
    pub format: Option<UploadFormat>,
    /// Session generation of the upload, when it went through a [`crate::session::PreviewSession`].
    pub generation: Option<u64>,
}

/// Stats reported when a preview is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewStats {
    /// Number of data rows kept.
    pub rows: usize,
    /// Number of columns.
    pub columns: usize,
}

/// Observer interface for preview outcomes.
///
/// Implementors can log, collect metrics, or show the user an alert.
pub trait PreviewObserver: Send + Sync {
    /// Called when a preview was produced.
    fn on_success(&self, _ctx: &PreviewContext, _stats: PreviewStats) {}

    /// Called when an upload was rejected or failed to decode.
    fn on_failure(&self, _ctx: &PreviewContext, _severity: PreviewSeverity, _error: &PreviewError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &PreviewContext, severity: PreviewSeverity, error: &PreviewError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Report `error` to `observer`, alerting when `severity >= alert_at_or_above`.
pub(crate) fn report_failure(
    observer: Option<&Arc<dyn PreviewObserver>>,
    alert_at_or_above: PreviewSeverity,
    ctx: &PreviewContext,
    error: &PreviewError,
) {
    let Some(obs) = observer else {
        return;
    };
    let sev = PreviewSeverity::for_error(error);
    obs.on_failure(ctx, sev, error);
    if sev >= alert_at_or_above {
        obs.on_alert(ctx, sev, error);
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PreviewObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn PreviewObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PreviewObserver for CompositeObserver {
    fn on_success(&self, ctx: &PreviewContext, stats: PreviewStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(&self, ctx: &PreviewContext, severity: PreviewSeverity, error: &PreviewError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &PreviewContext, severity: PreviewSeverity, error: &PreviewError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits preview events as `tracing` events.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PreviewObserver for TracingObserver {
    fn on_success(&self, ctx: &PreviewContext, stats: PreviewStats) {
        info!(
            file = %ctx.file_name,
            format = ?ctx.format,
            generation = ?ctx.generation,
            rows = stats.rows,
            columns = stats.columns,
            "preview ready"
        );
    }

    fn on_failure(&self, ctx: &PreviewContext, severity: PreviewSeverity, err: &PreviewError) {
        match severity {
            PreviewSeverity::Info | PreviewSeverity::Warning => warn!(
                file = %ctx.file_name,
                format = ?ctx.format,
                ?severity,
                error = %err,
                "upload rejected"
            ),
            PreviewSeverity::Error | PreviewSeverity::Critical => error!(
                file = %ctx.file_name,
                format = ?ctx.format,
                ?severity,
                error = %err,
                "preview failed"
            ),
        }
    }

    // Logged once by on_failure already.
    fn on_alert(&self, _ctx: &PreviewContext, _severity: PreviewSeverity, _error: &PreviewError) {}
}

/// Shows alerts to the user on stderr. Non-alert events are ignored.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl PreviewObserver for StdErrObserver {
    fn on_alert(&self, _ctx: &PreviewContext, _severity: PreviewSeverity, error: &PreviewError) {
        eprintln!("{error}");
    }
}
