//! Document-level types.

use serde::{Deserialize, Serialize};

use super::Block;

/// A document whose structure has been recovered from glyph geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Pages in reading order, numbers strictly increasing from 1
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Iterate every span font size in the document, in page order.
    ///
    /// Sizes of 0 (unknown) are skipped; used for the body-size median.
    pub fn span_font_sizes(&self) -> impl Iterator<Item = f32> + '_ {
        self.pages
            .iter()
            .flat_map(|p| p.blocks.iter())
            .flat_map(|b| b.lines.iter())
            .flat_map(|l| l.spans.iter())
            .map(|s| s.pos.font_size)
            .filter(|size| *size > 0.0)
    }
}

/// A single page in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Content blocks on the page, top to bottom
    pub blocks: Vec<Block>,
}

impl Page {
    /// Create an empty page with the given number.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            blocks: Vec::new(),
        }
    }

    /// Check if the page has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Add a block to the page.
    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Line, Position, Span};

    fn sized_span(size: f32) -> Span {
        Span::new(
            "x",
            Position {
                font_size: size,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_span_font_sizes_skips_unknown() {
        let mut doc = Document::new();
        let mut page = Page::new(1);
        let mut block = Block::new();
        let mut line = Line::new();
        line.spans.push(sized_span(12.0));
        line.spans.push(sized_span(0.0));
        line.spans.push(sized_span(18.0));
        block.lines.push(line);
        page.add_block(block);
        doc.add_page(page);

        let sizes: Vec<f32> = doc.span_font_sizes().collect();
        assert_eq!(sizes, vec![12.0, 18.0]);
    }

    #[test]
    fn test_document_json_shape() {
        let mut doc = Document::new();
        let mut page = Page::new(1);
        let mut block = Block::new();
        let mut line = Line::new();
        line.spans.push(Span::new(
            "Hello",
            Position {
                page: 1,
                x: 72.0,
                y: 700.0,
                width: 30.0,
                font: "Regular".to_string(),
                font_size: 12.0,
            },
        ));
        block.lines.push(line);
        page.add_block(block);
        doc.add_page(page);

        let json = serde_json::to_string(&doc).unwrap();
        assert!(json.contains("\"pages\""));
        assert!(json.contains("\"number\":1"));
        assert!(json.contains("\"blocks\""));
        assert!(json.contains("\"lines\""));
        assert!(json.contains("\"spans\""));
        assert!(json.contains("\"pos\""));
    }
}
