//! Block-level types: blocks, lines, spans, and glyph positions.

use serde::{Deserialize, Serialize};

/// Where a piece of text lives on the page, in PDF user space.
///
/// Y increases upward; `width` is the accumulated glyph advance of the
/// span (0 when the source font carried no metrics).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// 1-based page number
    pub page: u32,
    /// X of the left edge
    pub x: f32,
    /// Y of the baseline
    pub y: f32,
    /// Accumulated advance width
    pub width: f32,
    /// Font name, empty when unknown
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub font: String,
    /// Font size in points, 0 when unknown
    #[serde(default, skip_serializing_if = "is_zero")]
    pub font_size: f32,
}

fn is_zero(v: &f32) -> bool {
    *v == 0.0
}

/// One word inside a line, with its originating geometry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Word text
    pub text: String,
    /// Geometry of the word's first glyph, width spanning the word
    pub pos: Position,
}

impl Span {
    /// Create a span from text and position.
    pub fn new(text: impl Into<String>, pos: Position) -> Self {
        Self {
            text: text.into(),
            pos,
        }
    }
}

/// A line of spans sharing a baseline, left to right.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    /// Spans ordered by X
    pub spans: Vec<Span>,
}

impl Line {
    /// Create an empty line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the line holds no spans.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Largest font size carried by any span in the line.
    pub fn max_font_size(&self) -> f32 {
        self.spans
            .iter()
            .map(|s| s.pos.font_size)
            .fold(0.0, f32::max)
    }
}

/// Consecutive lines separated by less than a blank-line gap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Lines ordered top to bottom
    pub lines: Vec<Line>,
}

impl Block {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the block holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
