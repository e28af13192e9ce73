//! Glyph records and the glyph-source contract.

use crate::error::Result;

/// One text emission from a PDF content stream with its placement.
///
/// A record may carry a single character or a short ligature/run; the
/// lexer treats it as an indivisible unit when building words.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Glyph {
    /// Decoded text, never empty
    pub text: String,
    /// X of the left edge in PDF user space
    pub x: f32,
    /// Y of the baseline in PDF user space (increases upward)
    pub y: f32,
    /// Advance width, 0 when the font carried no metrics
    pub width: f32,
    /// Font name, empty when unknown
    pub font: String,
    /// Font size in points
    pub font_size: f32,
}

impl Glyph {
    /// Horizontal advance of this glyph.
    ///
    /// Falls back to `rune count * font size * scale` when the source
    /// reported no width.
    pub fn advance(&self, missing_width_scale: f32) -> f32 {
        if self.width > 0.0 {
            self.width
        } else {
            self.text.chars().count() as f32 * self.font_size * missing_width_scale
        }
    }

    /// Whether the advance width is unknown.
    pub fn width_unknown(&self) -> bool {
        self.width <= 0.0
    }
}

/// Supplier of glyph records, one page at a time.
///
/// Implemented by the lopdf-backed adapter in [`crate::pdf`]; tests
/// and benchmarks provide in-memory implementations.
pub trait GlyphSource {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Glyph records for a 1-based page, in arbitrary order.
    fn glyphs(&self, page: u32) -> Result<Vec<Glyph>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_prefers_known_width() {
        let glyph = Glyph {
            text: "abc".to_string(),
            width: 21.0,
            font_size: 12.0,
            ..Default::default()
        };
        assert_eq!(glyph.advance(0.6), 21.0);
        assert!(!glyph.width_unknown());
    }

    #[test]
    fn test_advance_falls_back_on_rune_count() {
        let glyph = Glyph {
            text: "abc".to_string(),
            width: 0.0,
            font_size: 10.0,
            ..Default::default()
        };
        // 3 runes * 10pt * 0.6
        assert_eq!(glyph.advance(0.6), 18.0);
        assert!(glyph.width_unknown());
    }
}
