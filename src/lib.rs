//! # yapp
//!
//! Recovers logical document structure from the flat, position-only
//! glyph stream of a PDF and emits clean Markdown.
//!
//! The pipeline is a small compiler: a lexer clusters glyphs into
//! word/newline/page-break tokens using geometric gaps, a parser folds
//! the tokens into a Page → Block → Line → Span AST, and a renderer
//! classifies each line's structural role (heading, paragraph, bullet,
//! table row, aside) from typography and horizontal positions.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> yapp::Result<()> {
//!     let result = yapp::parse_file("document.pdf")?;
//!     println!("{}", result.markdown);
//!     Ok(())
//! }
//! ```
//!
//! Every heuristic threshold is exposed through [`LexerOptions`] and
//! [`RenderOptions`], so tuning does not require editing logic:
//!
//! ```no_run
//! use yapp::{LexerOptions, RenderOptions};
//!
//! let lexer = LexerOptions::new().with_word_gap_scale(0.42);
//! let render = RenderOptions::new().with_heading_size_ratio(1.5);
//! let result = yapp::parse_file_with_options("document.pdf", lexer, render)?;
//! # Ok::<(), yapp::Error>(())
//! ```

pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod pdf;
pub mod render;

pub use error::{Error, Result};
pub use lexer::{Glyph, GlyphSource, Lexer, LexerOptions, Token};
pub use model::{Block, Document, Line, Page, Position, Span};
pub use parser::DocumentBuilder;
pub use pdf::PdfGlyphs;
pub use render::{JsonFormat, RenderOptions};

use std::path::Path;

/// Output of a pipeline run: the AST and its rendered Markdown.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The recovered document structure
    pub document: Document,
    /// Rendered Markdown, trailing-whitespace stripped, newline-terminated
    pub markdown: String,
}

/// Convert a PDF file to structure and Markdown.
///
/// # Example
///
/// ```no_run
/// let result = yapp::parse_file("catalog.pdf").unwrap();
/// assert!(result.markdown.ends_with('\n'));
/// println!("{} pages", result.document.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<ParseResult> {
    parse_file_with_options(path, LexerOptions::default(), RenderOptions::default())
}

/// Convert a PDF file with custom thresholds.
pub fn parse_file_with_options<P: AsRef<Path>>(
    path: P,
    lexer: LexerOptions,
    render: RenderOptions,
) -> Result<ParseResult> {
    let source = PdfGlyphs::open(path)?;
    parse_source_with_options(&source, lexer, render)
}

/// Convert PDF bytes to structure and Markdown.
pub fn parse_bytes(data: &[u8]) -> Result<ParseResult> {
    let source = PdfGlyphs::from_bytes(data)?;
    parse_source(&source)
}

/// Run the pipeline over any glyph source.
///
/// This is the seam the tests and benchmarks use: anything that can
/// yield positioned glyph records per page can be converted.
pub fn parse_source<S: GlyphSource>(source: &S) -> Result<ParseResult> {
    parse_source_with_options(source, LexerOptions::default(), RenderOptions::default())
}

/// Run the pipeline over any glyph source with custom thresholds.
pub fn parse_source_with_options<S: GlyphSource>(
    source: &S,
    lexer: LexerOptions,
    render: RenderOptions,
) -> Result<ParseResult> {
    let tokens = Lexer::with_options(source, lexer).tokenize()?;
    let document = parser::parse(tokens);
    let markdown = render::to_markdown(&document, &render);
    Ok(ParseResult { document, markdown })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Empty;

    impl GlyphSource for Empty {
        fn page_count(&self) -> u32 {
            0
        }

        fn glyphs(&self, _page: u32) -> Result<Vec<Glyph>> {
            Ok(vec![])
        }
    }

    #[test]
    fn test_empty_source_yields_bare_newline() {
        let result = parse_source(&Empty).unwrap();
        assert!(result.document.is_empty());
        assert_eq!(result.markdown, "\n");
    }

    #[test]
    fn test_parse_file_missing_path() {
        let err = parse_file("/no/such/file.pdf").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
