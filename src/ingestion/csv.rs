//! Delimited-text (CSV) extraction.

use std::io::Read;

use tracing::{debug, warn};

use crate::error::PreviewError;
use crate::types::{CellValue, PreviewTable};

use super::extract::{ExtractSettings, Extraction, TabularExtractor};

/// Extraction strategy for `.csv` uploads.
///
/// Rules:
///
/// - The first line holds the column headers.
/// - Every later line becomes one record; cells stay strings, with no type coercion.
/// - Reading stops once the row budget is filled.
/// - A row with the wrong field count (or invalid UTF-8) ends extraction with an error; the rows
///   decoded before it are kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelimitedTextExtractor;

impl TabularExtractor for DelimitedTextExtractor {
    fn extract(&self, bytes: &[u8], settings: ExtractSettings) -> Extraction {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .delimiter(settings.delimiter)
            .from_reader(bytes);
        extract_csv_from_reader(&mut rdr, settings.budget.data_rows())
    }
}

/// Extract at most `limit` records from an existing CSV reader.
pub fn extract_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>, limit: usize) -> Extraction {
    let headers: Vec<String> = match rdr.headers() {
        Ok(h) => h.iter().map(str::to_owned).collect(),
        Err(e) => {
            warn!(error = %e, "error parsing csv header");
            return Extraction::failed(PreviewError::Csv(e));
        }
    };

    let mut rows: Vec<Vec<CellValue>> = Vec::with_capacity(limit);
    for result in rdr.records().take(limit) {
        match result {
            Ok(record) => rows.push(record.iter().map(CellValue::text).collect()),
            Err(e) => {
                warn!(error = %e, rows_kept = rows.len(), "error parsing csv");
                return Extraction::partial(PreviewTable::new(headers, rows), PreviewError::Csv(e));
            }
        }
    }

    debug!(columns = headers.len(), rows = rows.len(), "parsed csv data");
    Extraction::complete(PreviewTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(input: &str) -> csv::Reader<&[u8]> {
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(input.as_bytes())
    }

    #[test]
    fn limit_stops_reading_before_bad_rows() {
        let input = "a,b\n1,2\n3,4\n5\n";
        let ex = extract_csv_from_reader(&mut reader(input), 2);
        assert!(ex.is_complete());
        assert_eq!(ex.table.row_count(), 2);
    }

    #[test]
    fn zero_limit_keeps_headers_only() {
        let ex = extract_csv_from_reader(&mut reader("a,b\n1,2\n"), 0);
        assert!(ex.is_complete());
        assert_eq!(ex.table.headers, vec!["a", "b"]);
        assert!(ex.table.rows.is_empty());
    }
}
