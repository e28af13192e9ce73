//! Rendering thresholds and configuration.

/// Typographic and positional thresholds for structure detection.
///
/// Scale factors multiply the document body size (the median span
/// font size); absolute values are PDF units.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Font-size multiple of body size that marks a heading
    pub heading_size_ratio: f32,

    /// Uppercase-letter ratio above which a short line is a heading
    pub heading_upper_ratio: f32,

    /// Minimum horizontal gap that separates table cells
    pub cell_gap_floor: f32,

    /// Font-size multiple that widens the cell-separating gap
    pub cell_gap_font_scale: f32,

    /// First-pass distance for merging column anchors
    pub column_merge_tol1: f32,

    /// Second-pass distance for merging column anchors
    pub column_merge_tol2: f32,

    /// Fewest columns a detected table may have
    pub table_min_cols: usize,

    /// Most columns a detected table may have
    pub table_max_cols: usize,

    /// Minimum median gap between column anchors
    pub table_min_row_gap: f32,

    /// Body size assumed when no span carries a font size
    pub body_size_fallback: f32,

    /// Lowercased font-name fragments that mark italic text
    pub italic_hints: Vec<String>,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading font-size ratio.
    pub fn with_heading_size_ratio(mut self, ratio: f32) -> Self {
        self.heading_size_ratio = ratio;
        self
    }

    /// Set the heading uppercase ratio.
    pub fn with_heading_upper_ratio(mut self, ratio: f32) -> Self {
        self.heading_upper_ratio = ratio;
        self
    }

    /// Set the cell-gap font scale.
    pub fn with_cell_gap_font_scale(mut self, scale: f32) -> Self {
        self.cell_gap_font_scale = scale;
        self
    }

    /// Set both column-anchor merge tolerances.
    pub fn with_column_merge_tols(mut self, first: f32, second: f32) -> Self {
        self.column_merge_tol1 = first;
        self.column_merge_tol2 = second;
        self
    }

    /// Set the accepted table column range.
    pub fn with_table_cols(mut self, min: usize, max: usize) -> Self {
        self.table_min_cols = min;
        self.table_max_cols = max;
        self
    }

    /// Set the minimum median column gap.
    pub fn with_table_min_row_gap(mut self, gap: f32) -> Self {
        self.table_min_row_gap = gap;
        self
    }

    /// Replace the italic font-name fragments.
    ///
    /// The default set includes the bare `it` fragment, which is
    /// aggressive and can match fonts like `LightItalian`; narrow it
    /// here when that misfires.
    pub fn with_italic_hints<I, S>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.italic_hints = hints.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_size_ratio: 1.35,
            heading_upper_ratio: 0.65,
            cell_gap_floor: 12.0,
            cell_gap_font_scale: 1.65,
            column_merge_tol1: 24.0,
            column_merge_tol2: 40.0,
            table_min_cols: 3,
            table_max_cols: 6,
            table_min_row_gap: 16.0,
            body_size_fallback: 12.0,
            italic_hints: vec![
                "italic".to_string(),
                "oblique".to_string(),
                "it".to_string(),
            ],
        }
    }
}
