//! Lexer thresholds and configuration.

/// Geometric thresholds used when clustering glyphs into tokens.
///
/// Defaults are calibrated for common office documents; every value is
/// in PDF units unless it is a scale factor applied to a font size.
#[derive(Debug, Clone)]
pub struct LexerOptions {
    /// Fixed baseline tolerance when grouping glyphs into lines
    pub line_tolerance: f32,

    /// Font-size multiple that can widen the baseline tolerance
    pub line_size_scale: f32,

    /// Vertical gap multiple (of line height) that signals a blank line
    pub blank_line_scale: f32,

    /// Minimum horizontal gap that can split two glyphs into words
    pub word_gap_floor: f32,

    /// Font-size multiple that widens the word-split gap
    pub word_gap_scale: f32,

    /// Slack multiple applied to the word gap for letter-spaced runs
    pub tracking_gap_scale: f32,

    /// Per-rune advance estimate (of font size) when width is unknown
    pub missing_width_scale: f32,
}

impl LexerOptions {
    /// Create new lexer options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fixed baseline tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the blank-line gap scale.
    pub fn with_blank_line_scale(mut self, scale: f32) -> Self {
        self.blank_line_scale = scale;
        self
    }

    /// Set the minimum word-splitting gap.
    pub fn with_word_gap_floor(mut self, floor: f32) -> Self {
        self.word_gap_floor = floor;
        self
    }

    /// Set the font-size scale of the word-splitting gap.
    pub fn with_word_gap_scale(mut self, scale: f32) -> Self {
        self.word_gap_scale = scale;
        self
    }

    /// Set the tracked-pair gap slack.
    pub fn with_tracking_gap_scale(mut self, scale: f32) -> Self {
        self.tracking_gap_scale = scale;
        self
    }

    /// Set the unknown-width advance estimate.
    pub fn with_missing_width_scale(mut self, scale: f32) -> Self {
        self.missing_width_scale = scale;
        self
    }
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 2.5,
            line_size_scale: 0.35,
            blank_line_scale: 1.35,
            word_gap_floor: 1.5,
            word_gap_scale: 0.38,
            tracking_gap_scale: 1.6,
            missing_width_scale: 0.6,
        }
    }
}
