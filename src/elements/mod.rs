//! Drawable content.
//!
//! Every piece of page content is a [`Content`] value. Each variant turns its
//! geometry, text and style into content stream operators against a
//! [`LayoutContext`]; [`Content::prepare`] stores the encoded stream as the
//! payload of the item's own PDF object.
//!
//! ## Paint order
//!
//! Items are painted in z-index order: items with `z_index == 0` first, then
//! ascending non-zero values. Items with equal z-index keep their declaration
//! order ([`sort_by_z_index`]).

mod barcode;
mod image;
mod path;
mod table;
mod text;

pub use barcode::Barcode;
pub use image::Image;
pub use path::{Shape, ShapeKind, BEZIER_K};
pub use table::{Border, CellBorders, Table, TableCell, TableRow};
pub use text::TextBox;

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::LayoutContext;
use crate::object::{Dictionary, PdfObject};
use crate::writer::content_stream::ContentStreamBuilder;
use crate::writer::object_serializer::CountingWriter;

pub(crate) fn default_font_name() -> String {
    "Helvetica".to_string()
}

pub(crate) fn default_font_size() -> i32 {
    12
}

/// A content item of a page or header/footer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    /// Wrapped, styled text
    TextBox(TextBox),
    /// Rectangle, ellipse or line
    Shape(Shape),
    /// Placed image
    Image(Image),
    /// Barcode symbol
    Barcode(Barcode),
    /// Table of text and image cells
    Table(Table),
}

impl From<TextBox> for Content {
    fn from(value: TextBox) -> Self {
        Content::TextBox(value)
    }
}

impl From<Shape> for Content {
    fn from(value: Shape) -> Self {
        Content::Shape(value)
    }
}

impl From<Image> for Content {
    fn from(value: Image) -> Self {
        Content::Image(value)
    }
}

impl From<Barcode> for Content {
    fn from(value: Barcode) -> Self {
        Content::Barcode(value)
    }
}

impl From<Table> for Content {
    fn from(value: Table) -> Self {
        Content::Table(value)
    }
}

impl Content {
    /// Paint order key.
    pub fn z_index(&self) -> i32 {
        match self {
            Content::TextBox(c) => c.z_index,
            Content::Shape(c) => c.z_index,
            Content::Image(c) => c.z_index,
            Content::Barcode(c) => c.z_index,
            Content::Table(c) => c.z_index,
        }
    }

    /// Comment written after the `obj` keyword.
    pub fn kind(&self) -> &'static str {
        match self {
            Content::TextBox(_) => "TextBox",
            Content::Shape(_) => "Shape",
            Content::Image(_) => "Image",
            Content::Barcode(_) => "Barcode",
            Content::Table(_) => "Table",
        }
    }

    /// PDF object of this item.
    pub fn object(&self) -> &PdfObject {
        match self {
            Content::TextBox(c) => &c.object,
            Content::Shape(c) => &c.object,
            Content::Image(c) => &c.object,
            Content::Barcode(c) => &c.object,
            Content::Table(c) => &c.object,
        }
    }

    /// Mutable PDF object of this item.
    pub fn object_mut(&mut self) -> &mut PdfObject {
        match self {
            Content::TextBox(c) => &mut c.object,
            Content::Shape(c) => &mut c.object,
            Content::Image(c) => &mut c.object,
            Content::Barcode(c) => &mut c.object,
            Content::Table(c) => &mut c.object,
        }
    }

    /// Names of the images this item draws.
    pub fn image_names(&self) -> Vec<&str> {
        match self {
            Content::Image(c) => vec![c.name.as_str()],
            Content::Table(c) => c.image_names(),
            _ => Vec::new(),
        }
    }

    /// Compute the operators of this item.
    pub fn build(&mut self, ctx: &LayoutContext<'_>) -> Result<ContentStreamBuilder> {
        match self {
            Content::TextBox(c) => c.build(ctx),
            Content::Shape(c) => c.build(),
            Content::Image(c) => c.build(ctx),
            Content::Barcode(c) => c.build(ctx),
            Content::Table(c) => c.build(ctx),
        }
    }

    /// Compute the stream and store it as the object payload.
    pub fn prepare(&mut self, ctx: &LayoutContext<'_>, compress: bool) -> Result<()> {
        let stream = self.build(ctx)?.build()?;
        log::trace!("{} stream: {} bytes", self.kind(), stream.len());
        let object = self.object_mut();
        object.set_payload(stream);
        object.prepare(compress)
    }

    /// Write the content stream object.
    pub fn publish<W: Write>(&mut self, w: &mut CountingWriter<W>) -> Result<()> {
        self.object_mut().publish(w, Dictionary::new())
    }
}

/// Stable sort into paint order: zero first, then ascending z-index.
pub fn sort_by_z_index(items: &mut [Content]) {
    items.sort_by_key(|c| (c.z_index() != 0, c.z_index()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape_at(x: i32, z_index: i32) -> Content {
        let mut shape = Shape::rectangle(x, 0, 10, 10);
        shape.z_index = z_index;
        shape.into()
    }

    fn order(items: &[Content]) -> Vec<(i32, i32)> {
        items
            .iter()
            .map(|c| match c {
                Content::Shape(s) => (s.pos_x, s.z_index),
                _ => unreachable!(),
            })
            .collect()
    }

    #[test]
    fn test_zero_sorts_first() {
        let mut items = vec![shape_at(1, 3), shape_at(2, 0), shape_at(3, -2), shape_at(4, 0)];
        sort_by_z_index(&mut items);
        assert_eq!(order(&items), vec![(2, 0), (4, 0), (3, -2), (1, 3)]);
    }

    #[test]
    fn test_equal_z_index_keeps_declaration_order() {
        let mut items = vec![shape_at(1, 5), shape_at(2, 5), shape_at(3, 1), shape_at(4, 5)];
        sort_by_z_index(&mut items);
        assert_eq!(order(&items), vec![(3, 1), (1, 5), (2, 5), (4, 5)]);
    }

    #[test]
    fn test_content_from_json() {
        let json = r##"[
            {"type": "text_box", "text": "Hi", "pos_x": 10, "pos_y": 20},
            {"type": "shape", "shape": "ellipse", "pos_x": 1, "pos_y": 2, "width": 3, "height": 4},
            {"type": "image", "name": "logo", "pos_x": 0, "pos_y": 0},
            {"type": "barcode", "text": "AB", "pos_x": 0, "pos_y": 0, "height": 30},
            {"type": "table", "pos_x": 0, "pos_y": 800, "width": 300, "rows": []}
        ]"##;
        let items: Vec<Content> = serde_json::from_str(json).unwrap();
        let kinds: Vec<_> = items.iter().map(|c| c.kind()).collect();
        assert_eq!(kinds, vec!["TextBox", "Shape", "Image", "Barcode", "Table"]);
        assert_eq!(items[2].image_names(), vec!["logo"]);
    }

    #[test]
    fn test_prepare_sets_payload() {
        let ctx = LayoutContext::new(595, 842, &[], &[]);
        let mut item: Content = Shape::rectangle(100, 100, 200, 100).into();
        item.prepare(&ctx, false).unwrap();
        let payload = String::from_utf8(item.object().payload().unwrap().to_vec()).unwrap();
        assert!(payload.contains("100 100 200 100 re"));
    }
}
