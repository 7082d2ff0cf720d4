//! Preview rendering.

use std::fmt::Write;

use crate::types::PreviewTable;

/// Heading shown above every preview.
pub const PREVIEW_HEADING: &str = "File Preview (First 5 Rows)";

/// Shown when no file has been parsed.
pub const NO_DATA_MESSAGE: &str = "No data to display. Please upload a file.";

fn has_data(table: Option<&PreviewTable>) -> Option<&PreviewTable> {
    table.filter(|t| !t.is_empty())
}

/// Render the preview as an HTML fragment.
///
/// All header and cell text is escaped.
pub fn render_html(table: Option<&PreviewTable>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "<h3>{PREVIEW_HEADING}</h3>");

    let Some(table) = has_data(table) else {
        let _ = writeln!(out, "<p>{NO_DATA_MESSAGE}</p>");
        return out;
    };

    out.push_str("<table>\n<thead>\n<tr>");
    for h in &table.headers {
        let _ = write!(out, "<th>{}</th>", escape_html(h));
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");
    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", escape_html(&cell.to_string()));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
    out
}

/// Render the preview as an aligned plain-text table.
pub fn render_text(table: Option<&PreviewTable>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{PREVIEW_HEADING}");

    let Some(table) = has_data(table) else {
        let _ = writeln!(out, "{NO_DATA_MESSAGE}");
        return out;
    };

    let grid = table.row_major();
    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            grid.iter()
                .filter_map(|row| row.get(c))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    for (idx, row) in grid.iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ");
        let _ = writeln!(out, "{}", line.trim_end());
        if idx == 0 {
            let rule = widths
                .iter()
                .map(|&w| "-".repeat(w))
                .collect::<Vec<_>>()
                .join("-+-");
            let _ = writeln!(out, "{rule}");
        }
    }
    out
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
