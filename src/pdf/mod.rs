//! PDF glyph acquisition backed by lopdf.

mod glyphs;

pub use glyphs::PdfGlyphs;
