// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::new_without_default)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]

//! # PDF Scribe
//!
//! PDF construction and serialization engine: turns a document description
//! (pages, text, shapes, images, barcodes, tables, fonts) into a PDF 1.4 file.
//!
//! ## Core Features
//!
//! - **Text**: greedy line wrapping with inline `<b>`/`<i>` markers, left,
//!   centered and right alignment, top or bottom anchoring
//! - **Shapes**: rectangles with rounded corners, ellipses and lines built
//!   from four-quadrant bezier curves
//! - **Barcodes**: Code 39 symbols drawn as stroked modules
//! - **Tables**: text and image cells with per-edge borders
//! - **Resources**: standard Type1 fonts, embedded TrueType programs,
//!   JPEG and PNG pass-through images with optional soft masks
//! - **Output**: deterministic object numbering, optional Flate compression,
//!   exact cross-reference offsets
//!
//! ## Quick Start
//!
//! ```ignore
//! use pdf_scribe::elements::TextBox;
//! use pdf_scribe::geometry::{Orientation, PageSize};
//! use pdf_scribe::Document;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut doc = Document::new();
//! doc.add_page(PageSize::A4, Orientation::Portrait)
//!     .add(TextBox::new("Hello, World!", 72, 760));
//! std::fs::write("hello.pdf", doc.to_bytes()?)?;
//! # Ok(())
//! # }
//! ```
//!
//! A whole document can also be read from JSON with
//! [`Document::from_json`].

#![warn(missing_docs)]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Object model
pub mod object;

// Typefaces and metrics
pub mod fonts;

// Geometry and layout
pub mod geometry;
pub mod layout;

// Drawable content
pub mod elements;

// PDF writing
pub mod writer;

pub use config::PublishConfig;
pub use elements::Content;
pub use error::{Error, Result};
pub use writer::Document;

// Version info
/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
