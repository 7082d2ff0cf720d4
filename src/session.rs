//! Owned preview state for an interactive front end.
//!
//! A [`PreviewSession`] is the single writer of the preview that is on screen. Each accepted
//! upload bumps a monotonic generation; decoding happens off the session (possibly on another
//! thread) and its [`DecodeCompletion`] is only applied if its generation is still current, so
//! a slow decode of an older file can never overwrite a newer preview.
//!
//! ```rust
//! use rhombus_preview::ingestion::{PreviewOptions, UploadedFile};
//! use rhombus_preview::session::{ApplyOutcome, PreviewSession};
//!
//! # fn main() -> Result<(), rhombus_preview::PreviewError> {
//! let mut session = PreviewSession::new(PreviewOptions::default());
//! let first = session.begin_upload(UploadedFile::new("a.csv", "x\n1\n"))?;
//! let second = session.begin_upload(UploadedFile::new("b.csv", "y\n2\n"))?;
//!
//! // The second decode finishes first; the first one arrives late and is ignored.
//! assert_eq!(session.apply(second.decode()), ApplyOutcome::Applied);
//! assert!(matches!(session.apply(first.decode()), ApplyOutcome::Stale { .. }));
//! assert_eq!(session.preview().unwrap().headers, vec!["y"]);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::mpsc::Sender;

use tracing::debug;

use crate::error::{PreviewError, PreviewResult};
use crate::ingestion::{
    ExtractSettings, Extraction, PreviewContext, PreviewOptions, UploadFormat, UploadedFile,
};
use crate::types::PreviewTable;

/// An accepted upload waiting to be decoded.
pub struct UploadTicket {
    generation: u64,
    file_name: String,
    format: UploadFormat,
    settings: ExtractSettings,
    bytes: Vec<u8>,
}

impl fmt::Debug for UploadTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadTicket")
            .field("generation", &self.generation)
            .field("file_name", &self.file_name)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadTicket {
    /// Generation assigned when the upload was accepted.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Format chosen from the file extension.
    pub fn format(&self) -> UploadFormat {
        self.format
    }

    /// Decode the file. Consumes the ticket; the bytes are dropped afterwards.
    pub fn decode(self) -> DecodeCompletion {
        let extraction = self.format.extractor().extract(&self.bytes, self.settings);
        DecodeCompletion {
            generation: self.generation,
            file_name: self.file_name,
            format: self.format,
            extraction,
        }
    }
}

/// Result of decoding an [`UploadTicket`], to be handed back to [`PreviewSession::apply`].
#[derive(Debug)]
pub struct DecodeCompletion {
    pub generation: u64,
    pub file_name: String,
    pub format: UploadFormat,
    pub extraction: Extraction,
}

/// What [`PreviewSession::apply`] did with a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The completion was current and is now the session's state.
    Applied,
    /// A newer upload started after this one; the completion was dropped.
    Stale { generation: u64, current: u64 },
}

/// Decode `ticket` on the rayon pool and send the completion to `sender`.
///
/// There is no cancellation: a superseded decode still runs to completion and is then
/// discarded by [`PreviewSession::apply`].
pub fn spawn_decode(ticket: UploadTicket, sender: Sender<DecodeCompletion>) {
    rayon::spawn(move || {
        let generation = ticket.generation;
        if sender.send(ticket.decode()).is_err() {
            debug!(generation, "preview session gone; dropping decode result");
        }
    });
}

/// Single-writer preview state.
pub struct PreviewSession {
    options: PreviewOptions,
    generation: u64,
    preview: Option<PreviewTable>,
    last_error: Option<PreviewError>,
}

impl fmt::Debug for PreviewSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewSession")
            .field("options", &self.options)
            .field("generation", &self.generation)
            .field("preview_rows", &self.preview.as_ref().map(PreviewTable::row_count))
            .field("last_error", &self.last_error)
            .finish()
    }
}

impl Default for PreviewSession {
    fn default() -> Self {
        Self::new(PreviewOptions::default())
    }
}

impl PreviewSession {
    /// Empty session that decodes with `options`.
    pub fn new(options: PreviewOptions) -> Self {
        Self {
            options,
            generation: 0,
            preview: None,
            last_error: None,
        }
    }

    /// Options applied to every upload.
    pub fn options(&self) -> &PreviewOptions {
        &self.options
    }

    /// Generation of the most recently accepted upload (0 before any upload).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current preview, if a file has been parsed since the last upload started.
    pub fn preview(&self) -> Option<&PreviewTable> {
        self.preview.as_ref()
    }

    /// The error from the most recent applied decode, if it failed.
    pub fn last_error(&self) -> Option<&PreviewError> {
        self.last_error.as_ref()
    }

    /// Drop the current preview and error. Does not invalidate in-flight decodes.
    pub fn clear(&mut self) {
        self.preview = None;
        self.last_error = None;
    }

    /// Accept an upload.
    ///
    /// An unsupported extension is rejected (and alerted) without touching any state. An
    /// accepted upload clears the previous preview before returning the ticket, so a
    /// slower decode never shows next to leftovers from an earlier file.
    pub fn begin_upload(&mut self, file: UploadedFile) -> PreviewResult<UploadTicket> {
        let format = match file.format() {
            Ok(format) => format,
            Err(e) => {
                let ctx = PreviewContext {
                    file_name: file.name,
                    format: None,
                    generation: None,
                };
                self.options.report_failure(&ctx, &e);
                return Err(e);
            }
        };

        self.clear();
        self.generation += 1;
        debug!(generation = self.generation, file = %file.name, %format, "upload accepted");

        Ok(UploadTicket {
            generation: self.generation,
            file_name: file.name,
            format,
            settings: self.options.settings_for(format),
            bytes: file.bytes,
        })
    }

    /// Apply a finished decode if it belongs to the latest upload.
    ///
    /// Rows decoded before a CSV error are kept alongside the error; a failed spreadsheet
    /// decode leaves no preview.
    pub fn apply(&mut self, completion: DecodeCompletion) -> ApplyOutcome {
        if completion.generation != self.generation {
            debug!(
                generation = completion.generation,
                current = self.generation,
                file = %completion.file_name,
                "ignoring stale decode"
            );
            return ApplyOutcome::Stale {
                generation: completion.generation,
                current: self.generation,
            };
        }

        let ctx = PreviewContext {
            file_name: completion.file_name,
            format: Some(completion.format),
            generation: Some(completion.generation),
        };
        let Extraction { table, error } = completion.extraction;
        match &error {
            Some(e) => self.options.report_failure(&ctx, e),
            None => self.options.report_success(&ctx, &table),
        }

        self.preview = (!table.is_empty()).then_some(table);
        self.last_error = error;
        ApplyOutcome::Applied
    }

    /// Accept, decode and apply an upload on the calling thread.
    pub fn upload(&mut self, file: UploadedFile) -> PreviewResult<ApplyOutcome> {
        let ticket = self.begin_upload(file)?;
        Ok(self.apply(ticket.decode()))
    }
}
