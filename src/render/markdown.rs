//! Markdown emission.
//!
//! Structure is derived afresh from per-line typography and horizontal
//! positions: every line of a page is classified as a bullet, table
//! seed, aside, heading or paragraph contribution, in that priority
//! order. The reference for "body text" is the document-wide median
//! span font size.

use crate::model::{Document, Page, Span};

use super::options::RenderOptions;
use super::table::consume_table;

/// Font-size ratio an uppercase line must reach to read as a heading.
const HEADING_UPPER_SIZE_RATIO: f32 = 1.05;
/// Font-size ratio a colon-terminated line must reach to read as a heading.
const HEADING_COLON_SIZE_RATIO: f32 = 1.1;
/// Character bounds of an aside line.
const ASIDE_MIN_CHARS: usize = 6;
const ASIDE_MAX_CHARS: usize = 140;
/// Furthest character position at which an aside's label colon may sit.
const ASIDE_COLON_MAX: usize = 32;
/// ASCII punctuation that attaches to the preceding word.
const ATTACHED_PUNCT: &str = ",.;:!?\"'()-";
/// Markers that open a bulleted item.
const BULLET_MARKERS: [&str; 13] = [
    "•", "-", "*", "‣", "▪", "◦", "●", "–", "—", "·", "→", "»", "›",
];

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> String {
    MarkdownRenderer::new(options.clone()).render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> String {
        let mut out = String::new();
        let body_size = median_font_size(doc).unwrap_or(self.options.body_size_fallback);
        log::debug!("body font size: {:.1}", body_size);

        // A header detected on one table is carried for the rest of
        // the document so continuation tables can inherit it.
        let mut last_header: Option<Vec<String>> = None;

        let total = doc.pages.len();
        for (page_index, page) in doc.pages.iter().enumerate() {
            if total > 1 {
                out.push_str("## Page ");
                out.push_str(&page.number.to_string());
                out.push_str("\n\n");
            }

            self.render_page(&mut out, page, page_index, body_size, &mut last_header);

            if total > 1 && page_index != total - 1 {
                out.push('\n');
            }
        }

        let mut result = out.trim_end().to_string();
        result.push('\n');
        result
    }

    fn render_page(
        &self,
        out: &mut String,
        page: &Page,
        page_index: usize,
        body_size: f32,
        last_header: &mut Option<Vec<String>>,
    ) {
        let lines = self.line_styles(page);
        let mut ctx = PageContext::new();

        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            let text = line.text.as_str();

            if text.is_empty() {
                ctx.flush_list(out);
                ctx.flush_para(out);
                i += 1;
                continue;
            }

            if let Some(item) = strip_bullet_marker(text) {
                ctx.flush_para(out);
                ctx.list.push(item);
                i += 1;
                continue;
            }

            if let Some(capture) =
                consume_table(&lines[i..], body_size, last_header.as_deref(), &self.options)
            {
                ctx.flush_list(out);
                ctx.flush_para(out);
                write_table(out, &capture.rows);
                if capture.has_header {
                    *last_header = Some(capture.rows[0].clone());
                }
                i += capture.used;
                continue;
            }

            if self.is_aside(text) {
                ctx.flush_list(out);
                ctx.flush_para(out);
                out.push_str("_");
                out.push_str(text);
                out.push_str("_\n\n");
                i += 1;
                continue;
            }

            let heading = self.is_heading_candidate(text, line.font_size, body_size);

            if ctx.first_heading && page_index == 0 && heading {
                ctx.flush_list(out);
                ctx.flush_para(out);
                out.push_str("# ");
                out.push_str(&self.italic_wrap(line, text));
                out.push_str("\n\n");
                ctx.first_heading = false;
                i += 1;
                continue;
            }

            if heading {
                ctx.flush_list(out);
                ctx.flush_para(out);
                out.push_str("## ");
                out.push_str(&self.italic_wrap(line, text));
                out.push_str("\n\n");
                i += 1;
                continue;
            }

            if text.ends_with(':') && text.chars().count() < 60 {
                ctx.flush_para(out);
                out.push_str("## ");
                out.push_str(&self.italic_wrap(line, text));
                out.push_str("\n\n");
                i += 1;
                continue;
            }

            ctx.para.push(self.italic_wrap(line, text));
            i += 1;
        }

        ctx.flush_list(out);
        ctx.flush_para(out);
    }

    /// Flatten a page's blocks into styled lines.
    fn line_styles(&self, page: &Page) -> Vec<LineStyle> {
        let mut lines = Vec::new();
        for block in &page.blocks {
            for line in &block.lines {
                let text = normalize_spaces(join_spans(&line.spans).trim());
                if text.is_empty() {
                    continue;
                }
                lines.push(LineStyle {
                    text,
                    font_size: line.max_font_size(),
                    italic: self.is_italic_line(&line.spans),
                    y: line.spans.first().map(|s| s.pos.y).unwrap_or(0.0),
                    spans: line.spans.clone(),
                });
            }
        }
        lines
    }

    /// A line is italic when most of its spans carry an italic font.
    fn is_italic_line(&self, spans: &[Span]) -> bool {
        if spans.is_empty() {
            return false;
        }
        let italic = spans
            .iter()
            .filter(|s| {
                let font = s.pos.font.to_lowercase();
                self.options.italic_hints.iter().any(|h| font.contains(h))
            })
            .count();
        italic as f32 / spans.len() as f32 >= 0.6
    }

    fn italic_wrap(&self, line: &LineStyle, text: &str) -> String {
        if line.italic && !(text.starts_with('_') && text.ends_with('_')) {
            format!("_{}_", text)
        } else {
            text.to_string()
        }
    }

    /// Short annotative `Label: content` lines render as italic text.
    fn is_aside(&self, text: &str) -> bool {
        let len = text.chars().count();
        if !(ASIDE_MIN_CHARS..=ASIDE_MAX_CHARS).contains(&len) {
            return false;
        }
        if text.contains('|') || strip_bullet_marker(text).is_some() {
            return false;
        }
        let colon = match text.chars().position(|c| c == ':') {
            Some(idx) => idx,
            None => return false,
        };
        if colon < 1 || colon > ASIDE_COLON_MAX || colon + 1 >= len {
            return false;
        }
        if text.split_whitespace().count() < 4 {
            return false;
        }
        uppercase_ratio(text) <= 0.5
    }

    /// Heading test against the document body size.
    fn is_heading_candidate(&self, text: &str, font_size: f32, body_size: f32) -> bool {
        let len = text.chars().count();
        if !(3..=120).contains(&len) {
            return false;
        }
        let words = text.split_whitespace().count();
        let upper = uppercase_ratio(text);

        if body_size > 0.0
            && font_size >= body_size * self.options.heading_size_ratio
            && words <= 14
        {
            return true;
        }
        if upper > self.options.heading_upper_ratio
            && words <= 10
            && (body_size == 0.0 || font_size >= body_size * HEADING_UPPER_SIZE_RATIO)
        {
            return true;
        }
        if text.ends_with(':')
            && body_size > 0.0
            && font_size >= body_size * HEADING_COLON_SIZE_RATIO
        {
            return true;
        }
        false
    }
}

/// One page's worth of classification state.
struct PageContext {
    para: Vec<String>,
    list: Vec<String>,
    first_heading: bool,
}

impl PageContext {
    fn new() -> Self {
        Self {
            para: Vec::new(),
            list: Vec::new(),
            first_heading: true,
        }
    }

    fn flush_para(&mut self, out: &mut String) {
        if self.para.is_empty() {
            return;
        }
        out.push_str(&join_wrapped(&self.para));
        out.push_str("\n\n");
        self.para.clear();
    }

    fn flush_list(&mut self, out: &mut String) {
        if self.list.is_empty() {
            return;
        }
        for item in &self.list {
            out.push_str("- ");
            out.push_str(item);
            out.push('\n');
        }
        out.push('\n');
        self.list.clear();
    }
}

/// A flattened line with the style hints classification needs.
#[derive(Debug, Clone)]
pub(crate) struct LineStyle {
    /// Space-normalized joined text
    pub(crate) text: String,
    /// Largest span font size
    pub(crate) font_size: f32,
    /// Whether the line reads as italic
    pub(crate) italic: bool,
    /// Baseline of the first span
    pub(crate) y: f32,
    /// The underlying spans, left to right
    pub(crate) spans: Vec<Span>,
}

/// Join spans with single spaces, attaching punctuation and
/// swallowing span-final wrap hyphens.
pub(crate) fn join_spans(spans: &[Span]) -> String {
    let mut out = String::new();
    let mut last: Option<&str> = None;

    for span in spans {
        let text = span.text.trim();
        if text.is_empty() {
            continue;
        }

        if let Some(prev) = last {
            if is_attached_punct(text) {
                // "word" + "," stays "word,"
            } else if prev.ends_with('-') && prev.chars().count() > 1 {
                // hyphenated wrap: "inter-" + "national" = "international"
                out.pop();
            } else {
                out.push(' ');
            }
        }

        out.push_str(text);
        last = Some(text);
    }

    out
}

/// Join paragraph lines, continuing hyphenated wraps across lines.
fn join_wrapped(lines: &[String]) -> String {
    let mut out = String::new();
    for line in lines {
        if out.is_empty() {
            out.push_str(line);
            continue;
        }
        if out.ends_with('-') && !out.ends_with(" -") {
            out.pop();
        } else {
            out.push(' ');
        }
        out.push_str(line);
    }
    out
}

/// Emit a Markdown table: header, separator, body rows, blank line.
pub(crate) fn write_table(out: &mut String, rows: &[Vec<String>]) {
    let header = match rows.first() {
        Some(h) => h,
        None => return,
    };

    out.push_str("| ");
    out.push_str(&header.join(" | "));
    out.push_str(" |\n| ");
    out.push_str(&vec!["---"; header.len()].join(" | "));
    out.push_str(" |\n");
    for row in &rows[1..] {
        out.push_str("| ");
        out.push_str(&row.join(" | "));
        out.push_str(" |\n");
    }
    out.push('\n');
}

/// Strip a bullet marker, returning the item text.
pub(crate) fn strip_bullet_marker(text: &str) -> Option<String> {
    strip_symbol_bullet(text).or_else(|| strip_ordered_bullet(text))
}

fn strip_symbol_bullet(text: &str) -> Option<String> {
    for marker in BULLET_MARKERS {
        if let Some(rest) = text.strip_prefix(marker) {
            if rest.starts_with(char::is_whitespace) {
                let body = rest.trim();
                if !body.is_empty() {
                    return Some(body.to_string());
                }
            }
        }
    }
    None
}

fn strip_ordered_bullet(text: &str) -> Option<String> {
    // "12." / "3)" style markers
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    if digits_end > 0 && digits_end < text.len() {
        let rest = &text[digits_end..];
        if let Some(after) = rest.strip_prefix(['.', ')']) {
            let body = after.trim();
            if !body.is_empty() {
                return Some(body.to_string());
            }
        }
    }

    // "a." / "B)" style markers
    let mut chars = text.chars();
    if let (Some(first), Some(second)) = (chars.next(), chars.next()) {
        if first.is_alphabetic() && (second == '.' || second == ')') {
            let body = chars.as_str().trim();
            if !body.is_empty() {
                return Some(body.to_string());
            }
        }
    }

    None
}

fn is_attached_punct(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| ATTACHED_PUNCT.contains(c))
}

/// Collapse all whitespace runs to single spaces.
pub(crate) fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Share of letters that are uppercase; 0 when there are no letters.
pub(crate) fn uppercase_ratio(text: &str) -> f32 {
    let mut letters = 0usize;
    let mut upper = 0usize;
    for c in text.chars() {
        if c.is_alphabetic() {
            letters += 1;
            if c.is_uppercase() {
                upper += 1;
            }
        }
    }
    if letters == 0 {
        0.0
    } else {
        upper as f32 / letters as f32
    }
}

/// Document-wide median span font size.
fn median_font_size(doc: &Document) -> Option<f32> {
    let mut sizes: Vec<f32> = doc.span_font_sizes().collect();
    if sizes.is_empty() {
        return None;
    }
    sizes.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(sizes[sizes.len() / 2])
}
