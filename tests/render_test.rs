//! Renderer behavior on hand-built documents.

use yapp::render::{to_json, to_markdown, JsonFormat};
use yapp::{Block, Document, Line, Page, Position, RenderOptions, Span};

fn span(text: &str, x: f32, y: f32, size: f32, font: &str) -> Span {
    Span::new(
        text,
        Position {
            page: 1,
            x,
            y,
            width: text.chars().count() as f32 * size * 0.5,
            font: font.to_string(),
            font_size: size,
        },
    )
}

fn page_from(number: u32, lines: Vec<Vec<Span>>) -> Page {
    let mut page = Page::new(number);
    let mut block = Block::new();
    for spans in lines {
        block.lines.push(Line { spans });
    }
    page.add_block(block);
    page
}

fn table_lines(y_start: f32, with_header: bool) -> Vec<Vec<Span>> {
    let xs = [72.0, 200.0, 320.0, 440.0];
    let mut lines = Vec::new();
    let mut y = y_start;
    if with_header {
        let header = ["SKU", "Description", "Unit", "Price"];
        lines.push(
            header
                .iter()
                .zip(xs)
                .map(|(t, x)| span(t, x, y, 7.0, "Regular"))
                .collect(),
        );
        y -= 16.0;
    }
    for row in [
        ["AB-100", "Widget", "each", "9.50"],
        ["CD-201", "Gadget", "each", "4.25"],
    ] {
        lines.push(
            row.iter()
                .zip(xs)
                .map(|(t, x)| span(t, x, y, 7.0, "Regular"))
                .collect(),
        );
        y -= 16.0;
    }
    lines
}

#[test]
fn single_page_has_no_frame() {
    let mut doc = Document::new();
    doc.add_page(page_from(
        1,
        vec![vec![span("Just one page", 72.0, 700.0, 12.0, "Regular")]],
    ));
    let md = to_markdown(&doc, &RenderOptions::default());
    assert!(!md.contains("## Page"));
}

#[test]
fn multi_page_frames_and_separators() {
    let mut doc = Document::new();
    for n in 1..=3 {
        doc.add_page(page_from(
            n,
            vec![vec![span("Body", 72.0, 700.0, 12.0, "Regular")]],
        ));
    }
    let md = to_markdown(&doc, &RenderOptions::default());
    assert!(md.starts_with("## Page 1\n\nBody\n\n\n## Page 2"));
    assert!(md.ends_with("## Page 3\n\nBody\n"));
}

#[test]
fn trailing_colon_short_line_becomes_heading() {
    let mut doc = Document::new();
    doc.add_page(page_from(
        1,
        vec![
            vec![span("Shipping options:", 72.0, 700.0, 12.0, "Regular")],
            vec![
                span("Ground", 72.0, 680.0, 12.0, "Regular"),
                span("only.", 125.0, 680.0, 12.0, "Regular"),
            ],
        ],
    ));
    let md = to_markdown(&doc, &RenderOptions::default());
    assert!(md.contains("## Shipping options:\n\nGround only.\n"));
}

#[test]
fn numeric_and_letter_bullets_collect_into_one_list() {
    let mut doc = Document::new();
    doc.add_page(page_from(
        1,
        vec![
            vec![span("1. first step", 72.0, 700.0, 12.0, "Regular")],
            vec![span("2) second step", 72.0, 686.0, 12.0, "Regular")],
            vec![span("a. lettered step", 72.0, 672.0, 12.0, "Regular")],
        ],
    ));
    let md = to_markdown(&doc, &RenderOptions::default());
    assert!(md.contains("- first step\n- second step\n- lettered step\n"));
}

#[test]
fn heading_flushes_pending_list() {
    let mut doc = Document::new();
    doc.add_page(page_from(
        1,
        vec![
            vec![span("• item", 72.0, 700.0, 12.0, "Regular")],
            vec![span("SUMMARY", 72.0, 680.0, 14.0, "Bold")],
            vec![
                span("After", 72.0, 660.0, 12.0, "Regular"),
                span("list.", 115.0, 660.0, 12.0, "Regular"),
            ],
        ],
    ));
    let md = to_markdown(&doc, &RenderOptions::default());
    let list_at = md.find("- item").unwrap();
    let heading_at = md.find("SUMMARY").unwrap();
    assert!(list_at < heading_at);
}

#[test]
fn italic_line_is_underscore_wrapped() {
    let mut doc = Document::new();
    doc.add_page(page_from(
        1,
        vec![
            vec![span("Heading Goes Here", 72.0, 700.0, 20.0, "Serif-Italic")],
            vec![
                span("regular", 72.0, 680.0, 12.0, "Serif"),
                span("body", 125.0, 680.0, 12.0, "Serif"),
            ],
        ],
    ));
    let md = to_markdown(&doc, &RenderOptions::default());
    assert!(md.contains("# _Heading Goes Here_\n"));
    assert!(md.contains("regular body\n"));
}

#[test]
fn italic_hints_are_configurable() {
    let mut doc = Document::new();
    doc.add_page(page_from(
        1,
        vec![vec![
            span("set", 72.0, 700.0, 12.0, "LightItalian"),
            span("in", 100.0, 700.0, 12.0, "LightItalian"),
            span("stone", 120.0, 700.0, 12.0, "LightItalian"),
        ]],
    ));

    // The default `it` fragment false-positives on LightItalian.
    let md = to_markdown(&doc, &RenderOptions::default());
    assert!(md.contains("_set in stone_"));

    let narrowed = RenderOptions::new().with_italic_hints(["italic", "oblique"]);
    let md = to_markdown(&doc, &narrowed);
    assert!(md.contains("set in stone"));
    assert!(!md.contains("_set in stone_"));
}

#[test]
fn full_table_renders_with_separator() {
    let mut doc = Document::new();
    doc.add_page(page_from(1, table_lines(700.0, true)));
    let md = to_markdown(&doc, &RenderOptions::default());
    assert!(md.contains("| SKU | Description | Unit | Price |\n| --- | --- | --- | --- |\n"));
    assert!(md.contains("| AB-100 | Widget | each | 9.50 |"));
}

#[test]
fn continuation_table_inherits_header_across_pages() {
    let mut doc = Document::new();
    doc.add_page(page_from(1, table_lines(700.0, true)));
    // Page 2 starts directly with SKU rows.
    let mut page2 = page_from(2, table_lines(700.0, false));
    for block in &mut page2.blocks {
        for line in &mut block.lines {
            for s in &mut line.spans {
                s.pos.page = 2;
            }
        }
    }
    doc.add_page(page2);

    let md = to_markdown(&doc, &RenderOptions::default());
    let header_hits = md.matches("| SKU | Description | Unit | Price |").count();
    assert_eq!(header_hits, 2, "page 2 should inherit the header:\n{}", md);
}

#[test]
fn lone_rows_without_any_header_still_render() {
    let mut doc = Document::new();
    doc.add_page(page_from(1, table_lines(700.0, false)));
    let md = to_markdown(&doc, &RenderOptions::default());
    // No remembered header exists, so the first data row leads.
    assert!(md.contains("| AB-100 | Widget | each | 9.50 |\n| --- | --- | --- | --- |\n"));
}

#[test]
fn json_dump_matches_ast() {
    let mut doc = Document::new();
    doc.add_page(page_from(
        1,
        vec![vec![span("Hello", 72.0, 700.0, 12.0, "Regular")]],
    ));
    let pretty = to_json(&doc, JsonFormat::Pretty).unwrap();
    assert!(pretty.contains("\"pages\""));
    let parsed: Document = serde_json::from_str(&pretty).unwrap();
    assert_eq!(parsed, doc);
}
