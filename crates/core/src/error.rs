//! Error types for the OpenCIP core.

use thiserror::Error;

/// Errors produced by context construction and rendering.
///
/// A render over an in-range [`VisualContext`](crate::VisualContext) never
/// fails on numeric grounds; these variants cover malformed outer input
/// (colors, names, dimensions) and cooperative cancellation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// Width or height was zero, or `width * height` overflowed.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// An algorithm name did not match any known kind.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// A palette name did not match any built-in palette.
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    /// The render was cancelled before every row completed.
    #[error("render cancelled after {completed_rows} of {total_rows} rows")]
    Cancelled {
        completed_rows: usize,
        total_rows: usize,
    },

    /// Writing or encoding the output failed.
    #[error("i/o error: {0}")]
    Io(String),
}
