//! Error types for rendering

use std::path::PathBuf;

use thiserror::Error;

/// The document could not be produced
#[derive(Error, Debug)]
pub enum RenderError {
    /// A line or table row is taller than an empty page
    #[error("{what} does not fit on a page ({height:.1}pt needed, {available:.1}pt available)")]
    Layout {
        what: String,
        height: f32,
        available: f32,
    },

    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The logo could not be turned into an embeddable image.
///
/// Never escapes the renderer: a missing or broken logo falls back to the
/// text wordmark.
#[derive(Error, Debug)]
pub enum LogoError {
    #[error("failed to read logo {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode logo: {0}")]
    Decode(#[from] image::ImageError),

    #[error("logo has no pixels")]
    Empty,

    #[error("failed to compress logo: {0}")]
    Compress(#[source] std::io::Error),
}
