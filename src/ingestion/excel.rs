#![cfg(feature = "excel")]

use std::io::Cursor;

use calamine::{Data, ExcelDateTime, Range, Reader, open_workbook_auto_from_rs};
use chrono::{NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use crate::error::{PreviewError, PreviewResult};
use crate::types::{CellValue, PreviewTable};

use super::extract::{ExtractSettings, Extraction, TabularExtractor};

/// Extraction strategy for `.xls` / `.xlsx` uploads.
///
/// Behavior:
/// - Decodes the whole workbook from memory (the container type is sniffed from the bytes)
/// - Uses the first sheet by position; a workbook without sheets is an error
/// - Row 0 of the sheet becomes the header
/// - Remaining cells keep their native scalar type
///
/// A decode failure yields no rows at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetExtractor;

impl TabularExtractor for SpreadsheetExtractor {
    fn extract(&self, bytes: &[u8], settings: ExtractSettings) -> Extraction {
        match first_sheet_range(bytes) {
            Ok(range) => {
                let table = sheet_to_table(&range, settings.budget.data_rows());
                debug!(
                    columns = table.column_count(),
                    rows = table.row_count(),
                    "parsed spreadsheet data"
                );
                Extraction::complete(table)
            }
            Err(e) => {
                warn!(error = %e, "error decoding spreadsheet");
                Extraction::failed(e)
            }
        }
    }
}

fn first_sheet_range(bytes: &[u8]) -> PreviewResult<Range<Data>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    sheet_at_position(workbook.worksheet_range_at(0))
}

/// `None` means the workbook has no sheet at that position.
fn sheet_at_position(
    found: Option<Result<Range<Data>, calamine::Error>>,
) -> PreviewResult<Range<Data>> {
    match found {
        Some(range) => Ok(range?),
        None => Err(PreviewError::EmptyWorkbook),
    }
}

/// Convert a sheet range into a table: row 0 is the header, then at most `limit` data rows.
pub fn sheet_to_table(range: &Range<Data>, limit: usize) -> PreviewTable {
    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(cell_to_header_string).collect(),
        None => return PreviewTable::empty(),
    };

    let rows = rows_iter
        .take(limit)
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    PreviewTable::new(headers, rows)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => convert_datetime(dt).to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => "".to_string(),
    }
}

fn convert_cell(c: &Data) -> CellValue {
    match c {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => convert_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::DateTime(s.clone()),
        Data::Error(e) => CellValue::Error(format!("{e:?}")),
    }
}

/// Dates become ISO 8601 text. Durations and out-of-range serials stay numeric.
fn convert_datetime(dt: &ExcelDateTime) -> CellValue {
    match dt.as_datetime() {
        Some(value) if dt.is_datetime() => CellValue::DateTime(iso_8601(value)),
        _ => CellValue::Float(dt.as_f64()),
    }
}

fn iso_8601(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_from(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height.saturating_sub(1), width.saturating_sub(1)));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    #[test]
    fn header_row_is_stringified_and_cells_keep_native_type() {
        let range = range_from(vec![
            vec![Data::String("id".into()), Data::Float(2024.0)],
            vec![Data::Int(1), Data::Float(98.5)],
            vec![Data::Bool(true), Data::Empty],
        ]);
        let table = sheet_to_table(&range, 10);
        assert_eq!(table.headers, vec!["id", "2024"]);
        assert_eq!(table.rows[0], vec![CellValue::Int(1), CellValue::Float(98.5)]);
        assert_eq!(table.rows[1], vec![CellValue::Bool(true), CellValue::Empty]);
    }

    #[test]
    fn limit_applies_to_data_rows() {
        let rows = (0..11)
            .map(|i| vec![Data::Int(i)])
            .collect::<Vec<_>>();
        let table = sheet_to_table(&range_from(rows), 4);
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.headers, vec!["0"]);
        assert_eq!(table.rows[3], vec![CellValue::Int(4)]);
    }

    #[test]
    fn empty_range_is_empty_table() {
        let range: Range<Data> = Range::empty();
        assert!(sheet_to_table(&range, 4).is_empty());
    }

    #[test]
    fn missing_first_sheet_is_empty_workbook() {
        let err = sheet_at_position(None).unwrap_err();
        assert!(matches!(err, PreviewError::EmptyWorkbook));
    }

    #[test]
    fn unreadable_first_sheet_is_spreadsheet_error() {
        let err = sheet_at_position(Some(Err(calamine::Error::Msg("bad sheet")))).unwrap_err();
        assert!(matches!(err, PreviewError::Spreadsheet(_)));
    }

    #[test]
    fn first_sheet_range_passes_through() {
        let range = range_from(vec![vec![Data::String("only".into())]]);
        let table = sheet_to_table(&sheet_at_position(Some(Ok(range))).unwrap(), 4);
        assert_eq!(table.headers, vec!["only"]);
    }

    #[test]
    fn midnight_renders_as_plain_date() {
        let day = chrono::NaiveDate::from_ymd_opt(2023, 3, 15).unwrap();
        assert_eq!(iso_8601(day.and_hms_opt(0, 0, 0).unwrap()), "2023-03-15");
        assert_eq!(
            iso_8601(day.and_hms_opt(12, 30, 5).unwrap()),
            "2023-03-15T12:30:05"
        );
    }
}
