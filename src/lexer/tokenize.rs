//! Glyph-to-token clustering.

use crate::error::{Error, Result};
use crate::model::Position;

use super::glyph::{Glyph, GlyphSource};
use super::options::LexerOptions;
use super::token::Token;

/// Punctuation allowed inside a letter-spaced run (SKUs, acronyms).
const TRACKED_PUNCT: [char; 5] = ['.', '-', '/', '%', '°'];

/// Clusters glyph records into a token stream in reading order.
pub struct Lexer<'a, S> {
    source: &'a S,
    options: LexerOptions,
}

impl<'a, S: GlyphSource> Lexer<'a, S> {
    /// Create a lexer over a glyph source with default options.
    pub fn new(source: &'a S) -> Self {
        Self::with_options(source, LexerOptions::default())
    }

    /// Create a lexer with custom thresholds.
    pub fn with_options(source: &'a S, options: LexerOptions) -> Self {
        Self { source, options }
    }

    /// Tokenize the whole document.
    ///
    /// Pages are visited 1..N with a [`Token::PageBreak`] between them;
    /// the stream always ends with [`Token::Eof`]. A page whose glyphs
    /// cannot be read fails the whole document.
    pub fn tokenize(&self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        let total = self.source.page_count();

        for page in 1..=total {
            if page > 1 {
                tokens.push(Token::PageBreak { page });
            }
            let glyphs = self
                .source
                .glyphs(page)
                .map_err(|e| Error::on_page(page, e))?;
            self.tokenize_page(page, glyphs, &mut tokens);
        }

        tokens.push(Token::Eof);
        Ok(tokens)
    }

    fn tokenize_page(&self, page: u32, glyphs: Vec<Glyph>, tokens: &mut Vec<Token>) {
        let lines = self.group_lines(glyphs);
        log::debug!("page {}: {} geometric lines", page, lines.len());

        let mut prev: Option<(f32, f32)> = None; // (baseline, height)
        for line in lines {
            let height = line
                .glyphs
                .iter()
                .map(|g| g.font_size)
                .fold(0.0f32, f32::max);

            // A vertical gap well beyond one line height reads as a
            // blank line and becomes an extra newline signal.
            if let Some((prev_y, prev_height)) = prev {
                let gap = prev_y - line.y;
                if gap > prev_height.max(height) * self.options.blank_line_scale {
                    tokens.push(Token::Newline { page, y: line.y });
                }
            }

            self.lex_words(page, &line.glyphs, tokens);
            tokens.push(Token::Newline { page, y: line.y });
            prev = Some((line.y, height));
        }
    }

    /// Group a page's glyphs into baseline lines, top to bottom.
    fn group_lines(&self, mut glyphs: Vec<Glyph>) -> Vec<GlyphLine> {
        if glyphs.is_empty() {
            return vec![];
        }

        // Reading order: Y descending, ties left to right.
        glyphs.sort_by(|a, b| {
            let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let mut lines: Vec<GlyphLine> = Vec::new();
        let mut current: Vec<Glyph> = Vec::new();
        let mut anchor_y = 0.0f32;

        for glyph in glyphs {
            let tolerance = self
                .options
                .line_tolerance
                .max(glyph.font_size * self.options.line_size_scale);

            if current.is_empty() {
                anchor_y = glyph.y;
                current.push(glyph);
            } else if (glyph.y - anchor_y).abs() <= tolerance {
                current.push(glyph);
            } else {
                lines.push(GlyphLine::close(std::mem::take(&mut current), anchor_y));
                anchor_y = glyph.y;
                current.push(glyph);
            }
        }
        if !current.is_empty() {
            lines.push(GlyphLine::close(current, anchor_y));
        }

        lines
    }

    /// Split one line's glyphs into word tokens.
    fn lex_words(&self, page: u32, glyphs: &[Glyph], tokens: &mut Vec<Token>) {
        let mut word: Option<WordBuilder> = None;

        for glyph in glyphs {
            // Decoder placeholders carry no content.
            if glyph.text.chars().all(|c| c == '\u{FFFD}') {
                continue;
            }

            // Explicit whitespace always ends the current word.
            if glyph.text.trim().is_empty() {
                if let Some(w) = word.take() {
                    tokens.push(w.finish(self.options.missing_width_scale));
                }
                continue;
            }

            word = Some(match word.take() {
                None => WordBuilder::start(page, glyph),
                Some(mut w) => {
                    let advance = w.last.advance(self.options.missing_width_scale);
                    let gap = glyph.x - (w.last.x + advance);
                    let threshold = self
                        .options
                        .word_gap_floor
                        .max(w.last.font_size.max(glyph.font_size) * self.options.word_gap_scale);

                    if gap > threshold && !self.is_tracked_pair(&w.last, glyph, gap, threshold) {
                        tokens.push(w.finish(self.options.missing_width_scale));
                        WordBuilder::start(page, glyph)
                    } else {
                        w.push(glyph);
                        w
                    }
                }
            });
        }

        if let Some(w) = word.take() {
            tokens.push(w.finish(self.options.missing_width_scale));
        }
    }

    /// Letter-spaced pairs stay one word despite an oversized gap.
    ///
    /// Requires unknown advance widths on both sides, a matching font
    /// and size, and runs limited to letters, digits and SKU-style
    /// punctuation.
    fn is_tracked_pair(&self, prev: &Glyph, next: &Glyph, gap: f32, threshold: f32) -> bool {
        prev.width_unknown()
            && next.width_unknown()
            && gap <= threshold * self.options.tracking_gap_scale
            && prev.font == next.font
            && (prev.font_size - next.font_size).abs() <= 0.1
            && is_tracked_run(&prev.text)
            && is_tracked_run(&next.text)
    }
}

/// A closed baseline line awaiting word segmentation.
struct GlyphLine {
    glyphs: Vec<Glyph>,
    y: f32,
}

impl GlyphLine {
    fn close(mut glyphs: Vec<Glyph>, y: f32) -> Self {
        glyphs.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        Self { glyphs, y }
    }
}

/// Accumulates adjacent glyphs into one word token.
struct WordBuilder {
    text: String,
    pos: Position,
    last: Glyph,
}

impl WordBuilder {
    fn start(page: u32, glyph: &Glyph) -> Self {
        Self {
            text: glyph.text.clone(),
            pos: Position {
                page,
                x: glyph.x,
                y: glyph.y,
                width: 0.0,
                font: glyph.font.clone(),
                font_size: glyph.font_size,
            },
            last: glyph.clone(),
        }
    }

    fn push(&mut self, glyph: &Glyph) {
        self.text.push_str(&glyph.text);
        self.last = glyph.clone();
    }

    fn finish(mut self, missing_width_scale: f32) -> Token {
        self.pos.width = (self.last.x + self.last.advance(missing_width_scale)) - self.pos.x;
        Token::Word {
            lexeme: self.text,
            pos: self.pos,
        }
    }
}

fn is_tracked_run(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_alphanumeric() || TRACKED_PUNCT.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PageGlyphs(Vec<Vec<Glyph>>);

    impl GlyphSource for PageGlyphs {
        fn page_count(&self) -> u32 {
            self.0.len() as u32
        }

        fn glyphs(&self, page: u32) -> Result<Vec<Glyph>> {
            Ok(self.0[(page - 1) as usize].clone())
        }
    }

    struct FailingSource;

    impl GlyphSource for FailingSource {
        fn page_count(&self) -> u32 {
            2
        }

        fn glyphs(&self, page: u32) -> Result<Vec<Glyph>> {
            if page == 2 {
                Err(Error::Input("bad stream".to_string()))
            } else {
                Ok(vec![])
            }
        }
    }

    fn glyph(text: &str, x: f32, y: f32) -> Glyph {
        Glyph {
            text: text.to_string(),
            x,
            y,
            width: 0.0,
            font: "Regular".to_string(),
            font_size: 12.0,
        }
    }

    fn words(tokens: &[Token]) -> Vec<String> {
        tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word { lexeme, .. } => Some(lexeme.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_close_glyphs_form_one_word() {
        // Gap of 0.5pt between advances is below the 4.56pt threshold.
        let source = PageGlyphs(vec![vec![glyph("H", 10.0, 700.0), glyph("i", 17.7, 700.0)]]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        assert_eq!(words(&tokens), vec!["Hi"]);
    }

    #[test]
    fn test_distant_glyphs_split_into_words() {
        let source = PageGlyphs(vec![vec![
            glyph("Hello", 10.0, 700.0),
            glyph("world", 60.0, 700.0),
        ]]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        assert_eq!(words(&tokens), vec!["Hello", "world"]);
    }

    #[test]
    fn test_whitespace_glyph_forces_split() {
        let source = PageGlyphs(vec![vec![
            glyph("a", 10.0, 700.0),
            glyph(" ", 17.2, 700.0),
            glyph("b", 24.4, 700.0),
        ]]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        assert_eq!(words(&tokens), vec!["a", "b"]);
    }

    #[test]
    fn test_replacement_glyphs_discarded() {
        let source = PageGlyphs(vec![vec![
            glyph("ok", 10.0, 700.0),
            glyph("\u{FFFD}", 25.0, 700.0),
        ]]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        assert_eq!(words(&tokens), vec!["ok"]);
    }

    #[test]
    fn test_tracked_pair_joins_letter_spaced_run() {
        // Threshold is max(1.5, 12 * 0.38) = 4.56; the 6pt gap splits
        // unless the tracked-pair exception applies (cap 7.296).
        let mut a = glyph("A", 10.0, 700.0);
        let mut b = glyph("B", 23.2, 700.0);
        a.width = 0.0;
        b.width = 0.0;
        // advance(A) = 1 * 12 * 0.6 = 7.2, so gap = 23.2 - 17.2 = 6.0
        let source = PageGlyphs(vec![vec![a, b]]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        assert_eq!(words(&tokens), vec!["AB"]);
    }

    #[test]
    fn test_tracked_pair_requires_matching_font() {
        let a = glyph("A", 10.0, 700.0);
        let mut b = glyph("B", 23.2, 700.0);
        b.font = "Regular-Bold".to_string();
        let source = PageGlyphs(vec![vec![a, b]]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        assert_eq!(words(&tokens), vec!["A", "B"]);
    }

    #[test]
    fn test_line_grouping_by_baseline() {
        let source = PageGlyphs(vec![vec![
            glyph("top", 10.0, 700.0),
            glyph("next", 45.0, 701.5), // within baseline tolerance
            glyph("below", 10.0, 690.0),
        ]]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        let newlines = tokens
            .iter()
            .filter(|t| matches!(t, Token::Newline { .. }))
            .count();
        assert_eq!(newlines, 2);
        assert_eq!(words(&tokens), vec!["top", "next", "below"]);
    }

    #[test]
    fn test_blank_line_gap_emits_extra_newline() {
        // 30pt gap > 12 * 1.35 = 16.2, so a blank-line newline appears.
        let source = PageGlyphs(vec![vec![
            glyph("first", 10.0, 700.0),
            glyph("second", 10.0, 670.0),
        ]]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        let newlines = tokens
            .iter()
            .filter(|t| matches!(t, Token::Newline { .. }))
            .count();
        assert_eq!(newlines, 3);
    }

    #[test]
    fn test_page_break_between_pages() {
        let source = PageGlyphs(vec![
            vec![glyph("one", 10.0, 700.0)],
            vec![glyph("two", 10.0, 700.0)],
        ]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        assert!(tokens.contains(&Token::PageBreak { page: 2 }));
        assert_eq!(tokens.last(), Some(&Token::Eof));
    }

    #[test]
    fn test_page_failure_carries_page_number() {
        let err = Lexer::new(&FailingSource).tokenize().unwrap_err();
        match err {
            Error::Page { page, .. } => assert_eq!(page, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_word_position_accumulates_width() {
        let source = PageGlyphs(vec![vec![glyph("H", 10.0, 700.0), glyph("i", 17.7, 700.0)]]);
        let tokens = Lexer::new(&source).tokenize().unwrap();
        match &tokens[0] {
            Token::Word { pos, .. } => {
                assert_eq!(pos.x, 10.0);
                // last glyph ends at 17.7 + 1 * 12 * 0.6 = 24.9
                assert!((pos.width - 14.9).abs() < 1e-4);
            }
            other => panic!("unexpected token: {other:?}"),
        }
    }
}
