//! Layout primitives shared by the content elements.
//!
//! - [`Color`]: `#rrggbb` colors and their PDF component form
//! - [`TextAlign`], [`VerticalPosition`]: text anchoring
//! - [`LayoutContext`]: page bounds plus the document font and image tables
//! - [`text_layout`]: greedy line wrapping with inline bold/italic markers

pub mod text_layout;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::writer::font_manager::{find_variant, font_resource_id, Font};
use crate::writer::image_handler::{image_resource_id, ImageResource};

pub use text_layout::{wrap_text, FontStyle, LayoutLine, StyledRun, TextLayout};

/// RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Create a new color.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a black color.
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Create a white color.
    pub fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Parse a `#rrggbb` string.
    pub fn parse(s: &str) -> Result<Self> {
        let hex = s
            .strip_prefix('#')
            .filter(|h| h.len() == 6 && h.is_ascii())
            .ok_or_else(|| Error::InvalidColor(s.to_string()))?;
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| Error::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Components in 0..=1, rounded to two decimals.
    pub fn components(&self) -> (f64, f64, f64) {
        let c = |v: u8| (v as f64 / 255.0 * 100.0).round() / 100.0;
        (c(self.r), c(self.g), c(self.b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Horizontal text alignment relative to the anchor X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Text starts at the anchor
    #[default]
    Left,
    /// Text is centered on the anchor
    Center,
    /// Text ends at the anchor
    Right,
}

/// Vertical anchoring of a text block relative to the anchor Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPosition {
    /// First baseline sits at the anchor
    #[default]
    Top,
    /// Last line sits at the anchor
    Bottom,
}

/// Inputs every content element lays itself out against.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    /// Width of the page content area
    pub content_width: i32,
    /// Height of the page content area
    pub content_height: i32,
    /// Document font table
    pub fonts: &'a [Font],
    /// Document image table
    pub images: &'a [ImageResource],
}

impl<'a> LayoutContext<'a> {
    /// Create a context for a content area.
    pub fn new(
        content_width: i32,
        content_height: i32,
        fonts: &'a [Font],
        images: &'a [ImageResource],
    ) -> Self {
        Self {
            content_width,
            content_height,
            fonts,
            images,
        }
    }

    /// Resolve a font face to its resource id and font.
    pub fn font(&self, font_name: &str, style: FontStyle) -> Result<(String, &'a Font)> {
        let (index, font) = find_variant(self.fonts, font_name, style.bold, style.italic)?;
        Ok((font_resource_id(index), font))
    }

    /// Resolve an image name to its resource id and image.
    pub fn image(&self, name: &str) -> Result<(String, &'a ImageResource)> {
        self.images
            .iter()
            .enumerate()
            .find(|(_, image)| image.name == name)
            .map(|(index, image)| (image_resource_id(index), image))
            .ok_or_else(|| Error::ImageNotFound(name.to_string()))
    }
}
