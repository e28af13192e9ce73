//! Error types for the yapp library.

use thiserror::Error;

/// Result type alias for yapp operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting a document.
#[derive(Error, Debug)]
pub enum Error {
    /// A required path is missing or unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// The PDF cannot be opened or its structure cannot be read.
    #[error("input error: {0}")]
    Input(String),

    /// A single page's glyphs cannot be read.
    #[error("read page {page}: {message}")]
    Page {
        /// 1-based page number that failed
        page: u32,
        /// Underlying cause
        message: String,
    },

    /// The output file cannot be created or written.
    #[error("write output: {0}")]
    Write(String),

    /// Rendering the document (JSON dump) failed.
    #[error("rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Wrap an error as a per-page read failure.
    pub fn on_page(page: u32, err: impl std::fmt::Display) -> Self {
        Error::Page {
            page,
            message: err.to_string(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Input(err.to_string())
    }
}
