//! Document model types for recovered PDF structure.
//!
//! This module defines the intermediate representation that bridges
//! token parsing and Markdown rendering: a document is an ordered list
//! of pages, a page an ordered list of blocks, a block an ordered list
//! of lines, and a line an ordered list of positioned spans.

mod block;
mod document;

pub use block::{Block, Line, Position, Span};
pub use document::{Document, Page};
