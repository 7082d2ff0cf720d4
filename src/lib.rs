//! `rhombus-preview` is a small library behind an "upload a table, type a pattern" front end.
//!
//! It takes an uploaded file, dispatches on its extension, decodes it into a normalized
//! [`types::PreviewTable`] bounded to a few rows, and submits free-text patterns to a
//! regex-generation service.
//!
//! ## What you can preview
//!
//! **File formats (dispatched by extension, case-insensitive):**
//!
//! - **Delimited text**: `.csv`. Header row required; cells stay strings.
//! - **Spreadsheets** (requires the Cargo feature `excel`, on by default): `.xls`, `.xlsx`.
//!   Only the first sheet is read; cells keep their native type.
//!
//! Anything else is rejected with [`PreviewError::UnsupportedFileType`] before any decoding.
//!
//! Both formats preview five rows by default, counted the way each format's array form counts
//! them: five records for CSV, and header plus four data rows for spreadsheets. Set
//! [`ingestion::PreviewOptions::row_budget`] to use one convention for both.
//!
//! ## Quick example
//!
//! ```rust
//! use rhombus_preview::ingestion::{preview_file, PreviewOptions, UploadedFile};
//! use rhombus_preview::render::render_text;
//!
//! # fn main() -> Result<(), rhombus_preview::PreviewError> {
//! let file = UploadedFile::new("people.csv", "name,age\nAlice,30\nBob,25\n");
//! let table = preview_file(&file, &PreviewOptions::default())?;
//! let alice = table.record(0).unwrap();
//! assert_eq!(alice.get("age").unwrap().as_str(), Some("30"));
//! println!("{}", render_text(Some(&table)));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: format dispatch, extraction strategies, observers
//! - [`session`]: owned preview state with stale-decode protection
//! - [`render`]: HTML and plain-text preview tables
//! - [`pattern`]: pattern submission to the regex-generation endpoint
//! - [`types`]: preview data model
//! - [`cli`]: the `rhombus-preview` command-line front end
//! - [`error`]: error types

pub mod cli;
pub mod error;
pub mod ingestion;
pub mod pattern;
pub mod render;
pub mod session;
pub mod types;

pub use error::{PreviewError, PreviewResult, SubmitError, SubmitResult};
