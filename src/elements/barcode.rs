//! Barcode symbols.
//!
//! Each character is drawn from its `0`/`1` pattern: every `1` module is a
//! vertical stroke one module wide, every `0` module a gap. The module width
//! of a character is its typeface width scaled by the font size, divided by
//! the pattern length.

use serde::{Deserialize, Serialize};

use super::default_font_name;
use crate::error::Result;
use crate::fonts::barcode::BarcodeTypeface;
use crate::fonts::encoding::encode_winansi;
use crate::layout::text_layout::FontStyle;
use crate::layout::{Color, LayoutContext};
use crate::object::PdfObject;
use crate::writer::content_stream::ContentStreamBuilder;

fn default_typeface() -> String {
    "Code39".to_string()
}

fn default_bar_size() -> i32 {
    20
}

fn default_text_size() -> i32 {
    10
}

/// Barcode drawn as stroked bars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barcode {
    /// Encoded text; uppercased before lookup
    pub text: String,
    /// Left edge of the first bar
    pub pos_x: i32,
    /// Bottom of the bars
    pub pos_y: i32,
    /// Paint order
    #[serde(default)]
    pub z_index: i32,
    /// Bar height
    pub height: i32,
    /// Barcode typeface name
    #[serde(default = "default_typeface")]
    pub typeface: String,
    /// Size the typeface widths are scaled by
    #[serde(default = "default_bar_size")]
    pub font_size: i32,
    /// Wrap the text in the typeface's start and stop characters
    #[serde(default)]
    pub include_start_stop: bool,
    /// Bar color
    #[serde(default)]
    pub color: Color,
    /// Print the text under the bars
    #[serde(default)]
    pub show_text: bool,
    /// Font family of the printed text
    #[serde(default = "default_font_name")]
    pub text_font: String,
    /// Size of the printed text
    #[serde(default = "default_text_size")]
    pub text_size: i32,
    /// Color of the printed text
    #[serde(default)]
    pub text_color: Color,
    /// PDF object state
    #[serde(skip)]
    pub object: PdfObject,
}

impl Barcode {
    /// Code 39 barcode with default sizes.
    pub fn new(text: impl Into<String>, pos_x: i32, pos_y: i32, height: i32) -> Self {
        Self {
            text: text.into(),
            pos_x,
            pos_y,
            z_index: 0,
            height,
            typeface: default_typeface(),
            font_size: default_bar_size(),
            include_start_stop: false,
            color: Color::black(),
            show_text: false,
            text_font: default_font_name(),
            text_size: default_text_size(),
            text_color: Color::black(),
            object: PdfObject::default(),
        }
    }

    /// Print the text under the bars.
    pub fn with_text(mut self, font_name: impl Into<String>, size: i32) -> Self {
        self.show_text = true;
        self.text_font = font_name.into();
        self.text_size = size;
        self
    }

    /// Characters actually encoded.
    pub fn symbols(&self, face: &BarcodeTypeface) -> String {
        let text = self.text.to_uppercase();
        if self.include_start_stop {
            format!("{}{}{}", face.start_character, text, face.stop_character)
        } else {
            text
        }
    }

    /// Compute the operators. Empty text draws nothing.
    pub fn build(&self, ctx: &LayoutContext<'_>) -> Result<ContentStreamBuilder> {
        let mut b = ContentStreamBuilder::new();
        if self.text.is_empty() {
            return Ok(b);
        }

        let face = BarcodeTypeface::by_name(&self.typeface)?;
        let bottom = self.pos_y as f64;
        let top = (self.pos_y + self.height) as f64;
        let mut x = self.pos_x as f64;

        b.stroke_color(self.color);
        for ch in self.symbols(&face).chars() {
            let (pattern, width) = face.symbol(ch)?;
            let module =
                width as f64 * self.font_size as f64 / 1000.0 / pattern.len() as f64;
            b.set_line_width(module);
            for bit in pattern.bytes() {
                if bit == b'1' {
                    let xc = x + module / 2.0;
                    b.move_to(xc, bottom).line_to(xc, top).stroke();
                }
                x += module;
            }
        }

        if self.show_text {
            self.caption(&mut b, ctx, x)?;
        }
        Ok(b)
    }

    /// Human-readable text centred under the bars.
    fn caption(
        &self,
        b: &mut ContentStreamBuilder,
        ctx: &LayoutContext<'_>,
        x_end: f64,
    ) -> Result<()> {
        let (id, font) = ctx.font(&self.text_font, FontStyle::default())?;
        let text_width = font.string_width(&self.text, self.text_size) as f64;
        let start = self.pos_x as f64;
        let x = start + (x_end - start - text_width) / 2.0;
        let y = (self.pos_y - self.text_size) as f64;

        b.begin_text()
            .fill_color(self.text_color)
            .set_font(&id, self.text_size as f64)
            .move_text(x, y)
            .show_text(encode_winansi(&self.text))
            .end_text();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::writer::font_manager::Font;

    fn render(barcode: &Barcode, fonts: &[Font]) -> String {
        let ctx = LayoutContext::new(595, 842, fonts, &[]);
        String::from_utf8(barcode.build(&ctx).unwrap().build().unwrap()).unwrap()
    }

    #[test]
    fn test_stroke_count_matches_patterns() {
        let face = BarcodeTypeface::code39();
        let expected: usize = "ABC"
            .chars()
            .map(|c| face.symbol(c).unwrap().0.matches('1').count())
            .sum();

        let out = render(&Barcode::new("abc", 10, 100, 40), &[]);
        let strokes = out.lines().filter(|l| *l == "S").count();
        assert_eq!(strokes, expected);
        assert_eq!(out.lines().filter(|l| l.ends_with(" m")).count(), expected);
    }

    #[test]
    fn test_module_geometry() {
        // 1300 * 20 / 1000 / 13 = 2pt modules
        let out = render(&Barcode::new("A", 10, 100, 40), &[]);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(&lines[..6], &["0 0 0 RG", "2 w", "11 100 m", "11 140 l", "S", "13 100 m"]);
        // "A" = 1101010010110: last bar is module 11
        assert!(out.ends_with("33 100 m\n33 140 l\nS"));
    }

    #[test]
    fn test_empty_text_draws_nothing() {
        let barcode = Barcode::new("", 10, 100, 40);
        let ctx = LayoutContext::new(595, 842, &[], &[]);
        assert!(barcode.build(&ctx).unwrap().is_empty());
    }

    #[test]
    fn test_start_stop_wrapping() {
        let mut barcode = Barcode::new("ab", 0, 0, 10);
        let face = BarcodeTypeface::code39();
        assert_eq!(barcode.symbols(&face), "AB");
        barcode.include_start_stop = true;
        assert_eq!(barcode.symbols(&face), "*AB*");
    }

    #[test]
    fn test_unknown_character_is_error() {
        let ctx = LayoutContext::new(595, 842, &[], &[]);
        let barcode = Barcode::new("a#b", 0, 0, 10);
        assert!(matches!(
            barcode.build(&ctx),
            Err(Error::BarcodeCharacter { character: '#', .. })
        ));
    }

    #[test]
    fn test_unknown_typeface_is_error() {
        let ctx = LayoutContext::new(595, 842, &[], &[]);
        let mut barcode = Barcode::new("A", 0, 0, 10);
        barcode.typeface = "EAN13".to_string();
        assert!(matches!(barcode.build(&ctx), Err(Error::UnknownTypeface(_))));
    }

    #[test]
    fn test_caption_centred_under_bars() {
        let fonts = Font::standard_family("Courier").unwrap();
        // Two characters span 52pt; "AB" in Courier 10 is 12pt wide.
        let barcode = Barcode::new("AB", 100, 200, 30).with_text("Courier", 10);
        let out = render(&barcode, &fonts);
        assert!(out.ends_with("BT\n0 0 0 rg\n/F1 10 Tf\n120 190 Td\n(AB) Tj\nET"));
    }
}
