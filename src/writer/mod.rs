//! PDF writing.
//!
//! ## Architecture
//!
//! ```text
//! Document (pages, headers/footers, fonts, font files, images, properties)
//!     ↓ embed_files
//! [ImageResource] / [FontFile] (raw bytes, raster and font metrics)
//!     ↓ prepare_streams
//! Content (elements → ContentStreamBuilder → stream bytes)
//!     ↓ position_objects
//! PdfObject (id, object number)
//!     ↓ publish
//! [ObjectSerializer] through [CountingWriter] (offsets, xref, trailer)
//!     ↓
//! PDF bytes
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use pdf_scribe::elements::{Shape, TextBox};
//! use pdf_scribe::geometry::{Orientation, PageSize};
//! use pdf_scribe::writer::Document;
//!
//! let mut doc = Document::new();
//! let page = doc.add_page(PageSize::A4, Orientation::Portrait);
//! page.add(TextBox::new("Hello, <b>World</b>!", 72, 760));
//! page.add(Shape::rectangle(72, 600, 200, 100));
//! let bytes = doc.to_bytes()?;
//! ```

pub mod content_stream;
pub mod document;
pub mod font_manager;
pub mod image_handler;
pub mod object_serializer;
pub mod page;
pub mod properties;
pub mod resource;

pub use content_stream::{ContentStreamBuilder, ContentStreamOp};
pub use document::Document;
pub use font_manager::{Font, FontFile};
pub use image_handler::{ColorSpace, ImageResource, RasterInfo};
pub use object_serializer::{CountingWriter, ObjectSerializer};
pub use page::{Catalog, HeaderFooter, Page, PageRoot};
pub use properties::{format_pdf_date, Properties};
pub use resource::ResourceSource;
