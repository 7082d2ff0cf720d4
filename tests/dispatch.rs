use std::sync::{Arc, Mutex};

use rhombus_preview::PreviewError;
use rhombus_preview::ingestion::{
    PreviewContext, PreviewObserver, PreviewOptions, PreviewSeverity, PreviewStats, UploadFormat,
    UploadedFile, preview_file, preview_from_path,
};
use rhombus_preview::session::PreviewSession;

#[derive(Default)]
struct RecordingObserver {
    successes: Mutex<Vec<PreviewStats>>,
    failures: Mutex<Vec<PreviewSeverity>>,
    alerts: Mutex<Vec<String>>,
}

impl PreviewObserver for RecordingObserver {
    fn on_success(&self, _ctx: &PreviewContext, stats: PreviewStats) {
        self.successes.lock().unwrap().push(stats);
    }

    fn on_failure(&self, _ctx: &PreviewContext, severity: PreviewSeverity, _error: &PreviewError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, ctx: &PreviewContext, _severity: PreviewSeverity, error: &PreviewError) {
        self.alerts
            .lock()
            .unwrap()
            .push(format!("{}: {error}", ctx.file_name));
    }
}

fn options_with(obs: &Arc<RecordingObserver>) -> PreviewOptions {
    PreviewOptions {
        observer: Some(obs.clone()),
        ..Default::default()
    }
}

#[test]
fn extension_selects_strategy() {
    assert_eq!(
        UploadedFile::new("a.csv", "").format().unwrap(),
        UploadFormat::DelimitedText
    );
    assert_eq!(
        UploadedFile::new("b.XLSX", "").format().unwrap(),
        UploadFormat::Spreadsheet
    );
    assert_eq!(
        UploadedFile::new("c.xls", "").format().unwrap(),
        UploadFormat::Spreadsheet
    );
}

#[test]
fn txt_upload_alerts_once_and_leaves_state_untouched() {
    let obs = Arc::new(RecordingObserver::default());
    let mut session = PreviewSession::new(options_with(&obs));
    session
        .upload(UploadedFile::new("people.csv", "name\nAda\n"))
        .unwrap();
    let before = session.preview().cloned();
    let generation = session.generation();

    let err = session
        .upload(UploadedFile::from_path("tests/fixtures/notes.txt").unwrap())
        .unwrap_err();

    assert!(matches!(
        err,
        PreviewError::UnsupportedFileType { ref extension, .. } if extension == "txt"
    ));
    assert_eq!(session.preview().cloned(), before);
    assert_eq!(session.generation(), generation);
    assert!(session.last_error().is_none());
    assert_eq!(obs.alerts.lock().unwrap().len(), 1);
    assert!(obs.alerts.lock().unwrap()[0].contains("Unsupported file type"));
    assert_eq!(obs.failures.lock().unwrap().clone(), vec![PreviewSeverity::Warning]);
}

#[test]
fn unsupported_upload_is_not_alerted_below_threshold() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = PreviewOptions {
        alert_at_or_above: PreviewSeverity::Error,
        ..options_with(&obs)
    };
    let _ = preview_file(&UploadedFile::new("data.json", "{}"), &opts).unwrap_err();

    assert_eq!(obs.failures.lock().unwrap().clone(), vec![PreviewSeverity::Warning]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn missing_file_is_critical() {
    let obs = Arc::new(RecordingObserver::default());
    let err = preview_from_path("tests/fixtures/does_not_exist.csv", &options_with(&obs)).unwrap_err();

    assert!(matches!(err, PreviewError::Io(_)));
    assert_eq!(obs.failures.lock().unwrap().clone(), vec![PreviewSeverity::Critical]);
    assert_eq!(obs.alerts.lock().unwrap().len(), 1);
}

#[test]
fn success_reports_stats() {
    let obs = Arc::new(RecordingObserver::default());
    preview_from_path("tests/fixtures/cities.csv", &options_with(&obs)).unwrap();

    assert_eq!(
        obs.successes.lock().unwrap().clone(),
        vec![PreviewStats { rows: 5, columns: 2 }]
    );
    assert!(obs.failures.lock().unwrap().is_empty());
}
