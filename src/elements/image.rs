//! Placed images.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::LayoutContext;
use crate::object::PdfObject;
use crate::writer::content_stream::ContentStreamBuilder;

/// Draws a document image resource into a box.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Name of the image resource
    pub name: String,
    /// Lower-left X
    pub pos_x: i32,
    /// Lower-left Y
    pub pos_y: i32,
    /// Paint order
    #[serde(default)]
    pub z_index: i32,
    /// Drawn width; the pixel width when unset
    #[serde(default)]
    pub width: Option<i32>,
    /// Drawn height; the pixel height when unset
    #[serde(default)]
    pub height: Option<i32>,
    /// PDF object state
    #[serde(skip)]
    pub object: PdfObject,
}

impl Image {
    /// Place an image at its pixel size.
    pub fn new(name: impl Into<String>, pos_x: i32, pos_y: i32) -> Self {
        Self {
            name: name.into(),
            pos_x,
            pos_y,
            z_index: 0,
            width: None,
            height: None,
            object: PdfObject::default(),
        }
    }

    /// Scale the image into a box.
    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Drawn size, falling back to the raster size.
    pub fn size(&self, ctx: &LayoutContext<'_>) -> Result<(i32, i32)> {
        if let (Some(w), Some(h)) = (self.width, self.height) {
            return Ok((w, h));
        }
        let (_, resource) = ctx.image(&self.name)?;
        let (pw, ph) = resource
            .pixel_size()
            .ok_or_else(|| Error::Image(format!("image '{}' was not embedded", self.name)))?;
        Ok((self.width.unwrap_or(pw as i32), self.height.unwrap_or(ph as i32)))
    }

    /// Compute the operators.
    pub fn build(&self, ctx: &LayoutContext<'_>) -> Result<ContentStreamBuilder> {
        let (id, _) = ctx.image(&self.name)?;
        let (width, height) = self.size(ctx)?;
        let mut b = ContentStreamBuilder::new();
        b.draw_image(
            &id,
            self.pos_x as f64,
            self.pos_y as f64,
            width as f64,
            height as f64,
        );
        Ok(b)
    }
}
