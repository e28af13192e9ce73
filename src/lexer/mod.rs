//! Lexical analysis: clustering positioned glyphs into word tokens.
//!
//! The lexer consumes glyph records page by page and emits a flat
//! token stream in reading order. All clustering decisions are
//! geometric: baseline proximity groups glyphs into lines, horizontal
//! gaps split lines into words, and oversized vertical gaps become
//! blank-line signals.

mod glyph;
mod options;
mod token;
mod tokenize;

pub use glyph::{Glyph, GlyphSource};
pub use options::LexerOptions;
pub use token::Token;
pub use tokenize::Lexer;
