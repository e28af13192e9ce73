//! Token-stream folding into pages, blocks and lines.

use crate::lexer::Token;
use crate::model::{Block, Document, Line, Page, Span};

/// Fold a token stream into a document.
///
/// Convenience wrapper over [`DocumentBuilder`].
pub fn parse<I: IntoIterator<Item = Token>>(tokens: I) -> Document {
    let mut builder = DocumentBuilder::new();
    for token in tokens {
        builder.push(token);
    }
    builder.finish()
}

/// Accumulates tokens into the document AST.
///
/// A word extends the current line; a newline closes it; two
/// consecutive newlines close the current block. Empty lines, blocks
/// and pages are elided as they close, so the finished document never
/// contains hollow containers.
pub struct DocumentBuilder {
    document: Document,
    page: Option<Page>,
    block: Block,
    line: Line,
    newlines: u32,
}

impl DocumentBuilder {
    /// Create a builder with no open page.
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            page: None,
            block: Block::new(),
            line: Line::new(),
            newlines: 0,
        }
    }

    /// Feed one token.
    pub fn push(&mut self, token: Token) {
        if self.page.is_none() {
            let number = token.page().unwrap_or(1).max(1);
            self.page = Some(Page::new(number));
        }

        match token {
            Token::Word { lexeme, pos } => {
                self.newlines = 0;
                self.line.spans.push(Span::new(lexeme, pos));
            }
            Token::Newline { .. } => {
                self.close_line();
                self.newlines += 1;
                if self.newlines >= 2 {
                    self.close_block();
                    self.newlines = 0;
                }
            }
            Token::PageBreak { page } => self.start_page(page),
            Token::Eof => {}
        }
    }

    /// Close any open containers and return the document.
    pub fn finish(mut self) -> Document {
        self.close_page();
        self.document
    }

    fn close_line(&mut self) {
        if self.line.is_empty() {
            return;
        }
        self.block.lines.push(std::mem::take(&mut self.line));
    }

    fn close_block(&mut self) {
        self.close_line();
        if self.block.is_empty() {
            return;
        }
        if let Some(page) = self.page.as_mut() {
            page.add_block(std::mem::take(&mut self.block));
        }
    }

    fn close_page(&mut self) {
        self.close_block();
        if let Some(page) = self.page.take() {
            if !page.is_empty() {
                self.document.add_page(page);
            }
        }
    }

    fn start_page(&mut self, number: u32) {
        self.close_page();
        self.page = Some(Page::new(number.max(1)));
        self.newlines = 0;
    }
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
