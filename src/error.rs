//! Error types for the PDF engine.
//!
//! This module defines all error types that can occur while laying out and
//! publishing a document. None of them are recovered from: a failed publish
//! never produces a file.

use std::path::PathBuf;

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document publishing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Position lies outside the page content area
    #[error("Position out of bounds: {axis} = {value} is outside [0, {limit}]")]
    OutOfBounds {
        /// Axis name ("x" or "y")
        axis: &'static str,
        /// Offending coordinate
        value: i32,
        /// Upper limit of the content area on that axis
        limit: i32,
    },

    /// Text width derived from the alignment is negative
    #[error("Derived text width is negative: {0}")]
    NegativeWidth(i32),

    /// External resource could not be read
    #[error("Failed to read resource '{}': {source}", path.display())]
    Resource {
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),

    /// Font face not present in the document font table
    #[error("Font not found: {0}")]
    FontNotFound(String),

    /// Image name not present in the document image table
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    /// Page names a header or footer the document does not define
    #[error("Header/footer not found: {0}")]
    HeaderFooterNotFound(String),

    /// Barcode typeface name is unknown
    #[error("Unknown barcode typeface: {0}")]
    UnknownTypeface(String),

    /// Character missing from a barcode typeface
    #[error("Character {character:?} is not defined in barcode typeface {typeface}")]
    BarcodeCharacter {
        /// Character that failed the lookup
        character: char,
        /// Typeface name
        typeface: String,
    },

    /// Malformed font data
    #[error("Font error: {0}")]
    Font(String),

    /// Malformed image data
    #[error("Image error: {0}")]
    Image(String),

    /// Color string is not `#rrggbb`
    #[error("Invalid color '{0}': expected #rrggbb")]
    InvalidColor(String),

    /// Document description could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
