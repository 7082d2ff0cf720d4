use rhombus_preview::render::{NO_DATA_MESSAGE, PREVIEW_HEADING, render_html, render_text};
use rhombus_preview::types::{CellValue, PreviewTable};

fn sample() -> PreviewTable {
    PreviewTable::new(
        vec!["name".into(), "note".into()],
        vec![
            vec![CellValue::text("Alice"), CellValue::text("<b>bold</b> & co")],
            vec![CellValue::text("Bob"), CellValue::Empty],
        ],
    )
}

#[test]
fn fallback_message_when_nothing_loaded() {
    for table in [None, Some(PreviewTable::empty())] {
        let html = render_html(table.as_ref());
        assert!(html.contains(PREVIEW_HEADING));
        assert!(html.contains(NO_DATA_MESSAGE));
        assert!(!html.contains("<table>"));

        assert!(render_text(table.as_ref()).contains(NO_DATA_MESSAGE));
    }
}

#[test]
fn html_has_header_cells_and_escaped_body() {
    let html = render_html(Some(&sample()));
    assert!(html.contains("<thead>\n<tr><th>name</th><th>note</th></tr>"));
    assert!(html.contains("<td>&lt;b&gt;bold&lt;/b&gt; &amp; co</td>"));
    assert!(html.contains("<tr><td>Bob</td><td></td></tr>"));
    assert_eq!(html.matches("<tr>").count(), 3);
    assert!(!html.contains(NO_DATA_MESSAGE));
}

#[test]
fn text_table_is_aligned() {
    let text = render_text(Some(&sample()));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            PREVIEW_HEADING,
            "name  | note",
            "------+-----------------",
            "Alice | <b>bold</b> & co",
            "Bob   |",
        ]
    );
}
