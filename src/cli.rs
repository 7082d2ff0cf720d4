//! Command-line front end.
//!
//! `preview` stands in for the file picker and table, `submit` for the pattern form.

use std::path::PathBuf;
use std::sync::{Arc, mpsc};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use crate::ingestion::unified::read_upload;
use crate::ingestion::{
    CompositeObserver, PreviewObserver, PreviewOptions, StdErrObserver, TracingObserver,
};
use crate::render::{render_html, render_text};
use crate::session::{PreviewSession, spawn_decode};
use crate::types::RowBudget;

/// Output format for previews
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table
    #[default]
    Text,
    /// HTML table fragment
    Html,
    /// JSON `{headers, rows}`
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "rhombus-preview")]
#[command(author, version, about = "Preview CSV/Excel uploads and submit regex patterns", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Preview the first rows of one or more uploads; the last accepted upload wins
    Preview {
        /// Files to upload, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Keep this many data rows for every format (header excluded)
        #[arg(long)]
        rows: Option<usize>,

        /// CSV field delimiter
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,
    },

    /// Submit a natural-language pattern to the regex-generation endpoint
    Submit {
        /// Pattern text, sent verbatim
        pattern: String,

        /// Endpoint URL (defaults to $RHOMBUS_REGEX_ENDPOINT, then the local dev server)
        #[arg(long)]
        endpoint: Option<String>,

        /// Give up after this many seconds (default: wait indefinitely)
        #[arg(long)]
        timeout_secs: Option<u64>,
    },
}

/// Parse arguments, install logging and run the selected command.
pub fn run_cli() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Preview {
            files,
            format,
            rows,
            delimiter,
        } => preview_command(&files, format, rows, delimiter),
        Commands::Submit {
            pattern,
            endpoint,
            timeout_secs,
        } => submit_command(pattern, endpoint, timeout_secs),
    }
}

fn preview_options(rows: Option<usize>, delimiter: char) -> Result<PreviewOptions> {
    if !delimiter.is_ascii() {
        bail!("delimiter must be a single ASCII character, got '{delimiter}'");
    }
    let observers: Vec<Arc<dyn PreviewObserver>> =
        vec![Arc::new(TracingObserver), Arc::new(StdErrObserver)];
    let observer: Arc<dyn PreviewObserver> = Arc::new(CompositeObserver::new(observers));
    Ok(PreviewOptions {
        row_budget: rows.map(RowBudget::DataRows),
        delimiter: delimiter as u8,
        observer: Some(observer),
        ..Default::default()
    })
}

fn preview_command(
    files: &[PathBuf],
    format: OutputFormat,
    rows: Option<usize>,
    delimiter: char,
) -> Result<()> {
    let mut session = PreviewSession::new(preview_options(rows, delimiter)?);
    let (tx, rx) = mpsc::channel();

    // Unreadable and rejected uploads were already alerted by the observer.
    for path in files {
        let Ok(file) = read_upload(path, session.options()) else {
            continue;
        };
        if let Ok(ticket) = session.begin_upload(file) {
            spawn_decode(ticket, tx.clone());
        }
    }
    drop(tx);

    for completion in rx {
        session.apply(completion);
    }

    let table = session.preview();
    match format {
        OutputFormat::Text => print!("{}", render_text(table)),
        OutputFormat::Html => print!("{}", render_html(table)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&table).context("failed to serialize preview")?
        ),
    }

    if let Some(e) = session.last_error() {
        eprintln!("preview incomplete: {e}");
    }
    Ok(())
}

#[cfg(feature = "submit")]
fn submit_command(pattern: String, endpoint: Option<String>, timeout_secs: Option<u64>) -> Result<()> {
    use std::time::Duration;

    use crate::pattern::{PatternQuery, PatternSubmitter, SubmitterConfig};

    let mut config = SubmitterConfig::from_env();
    if let Some(url) = endpoint {
        config.endpoint = url;
    }
    config.timeout = timeout_secs.map(Duration::from_secs);

    let submitter = PatternSubmitter::new(config).context("failed to build http client")?;
    let submission = submitter
        .submit(&PatternQuery::new(pattern))
        .with_context(|| format!("request to {} failed", submitter.endpoint()))?;
    println!("{} {}", submission.status, submission.body);
    Ok(())
}

#[cfg(not(feature = "submit"))]
fn submit_command(_pattern: String, _endpoint: Option<String>, _timeout_secs: Option<u64>) -> Result<()> {
    bail!("pattern submission not enabled (enable cargo feature 'submit')")
}
