//! Text boxes.
//!
//! A text box wraps its text to an available width, then places each line
//! according to its alignment. The anchor X is the left edge, centre or
//! right edge of every line; the anchor Y is the first baseline (top
//! anchoring) or the last baseline (bottom anchoring).

use serde::{Deserialize, Serialize};

use super::{default_font_name, default_font_size};
use crate::error::{Error, Result};
use crate::fonts::encoding::encode_winansi;
use crate::layout::text_layout::{wrap_text, TextLayout};
use crate::layout::{Color, LayoutContext, TextAlign, VerticalPosition};
use crate::object::PdfObject;
use crate::writer::content_stream::ContentStreamBuilder;

/// Block of wrapped text with inline `<b>`/`<i>` markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Text; `\n` starts a paragraph
    pub text: String,
    /// Anchor X
    pub pos_x: i32,
    /// Anchor Y
    pub pos_y: i32,
    /// Paint order
    #[serde(default)]
    pub z_index: i32,
    /// Available width; derived from the alignment when unset
    #[serde(default)]
    pub width: Option<i32>,
    /// Fixed height; set to the laid out height when unset
    #[serde(default)]
    pub height: Option<i32>,
    /// Font family
    #[serde(default = "default_font_name")]
    pub font_name: String,
    /// Font size in points
    #[serde(default = "default_font_size")]
    pub font_size: i32,
    /// Baseline distance; `font_size * 6 / 5` when unset
    #[serde(default)]
    pub line_height: Option<i32>,
    /// Text color
    #[serde(default)]
    pub color: Color,
    /// Horizontal alignment
    #[serde(default)]
    pub align: TextAlign,
    /// Vertical anchoring
    #[serde(default)]
    pub position: VerticalPosition,
    /// PDF object state
    #[serde(skip)]
    pub object: PdfObject,
}

impl TextBox {
    /// Left-aligned text in the default font.
    pub fn new(text: impl Into<String>, pos_x: i32, pos_y: i32) -> Self {
        Self {
            text: text.into(),
            pos_x,
            pos_y,
            z_index: 0,
            width: None,
            height: None,
            font_name: default_font_name(),
            font_size: default_font_size(),
            line_height: None,
            color: Color::black(),
            align: TextAlign::Left,
            position: VerticalPosition::Top,
            object: PdfObject::default(),
        }
    }

    /// Set font family and size.
    pub fn with_font(mut self, font_name: impl Into<String>, font_size: i32) -> Self {
        self.font_name = font_name.into();
        self.font_size = font_size;
        self
    }

    /// Set the alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the available width.
    pub fn with_width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    /// Distance between baselines.
    pub fn effective_line_height(&self) -> i32 {
        self.line_height.unwrap_or(self.font_size * 6 / 5)
    }

    /// Check the anchor lies inside the content area.
    fn check_bounds(&self, ctx: &LayoutContext<'_>) -> Result<()> {
        if self.pos_y < 0 || self.pos_y > ctx.content_height {
            return Err(Error::OutOfBounds {
                axis: "y",
                value: self.pos_y,
                limit: ctx.content_height,
            });
        }
        if self.pos_x < 0 || self.pos_x > ctx.content_width {
            return Err(Error::OutOfBounds {
                axis: "x",
                value: self.pos_x,
                limit: ctx.content_width,
            });
        }
        Ok(())
    }

    /// Width available to the text.
    pub fn available_width(&self, ctx: &LayoutContext<'_>) -> Result<i32> {
        let width = match (self.width, self.align) {
            (Some(width), _) => width,
            (None, TextAlign::Center) => {
                2 * (ctx.content_width - self.pos_x).min(self.pos_x)
            },
            (None, TextAlign::Right) => self.pos_x,
            (None, TextAlign::Left) => ctx.content_width - self.pos_x,
        };
        if width < 0 {
            return Err(Error::NegativeWidth(width));
        }
        Ok(width)
    }

    /// Wrap the text without producing operators.
    pub fn layout(&self, ctx: &LayoutContext<'_>) -> Result<TextLayout> {
        self.check_bounds(ctx)?;
        let available = self.available_width(ctx)?;
        let size = self.font_size.max(0) as u64;
        wrap_text(
            &self.text,
            available,
            self.effective_line_height(),
            self.height,
            |text, style| {
                let (_, font) = ctx.font(&self.font_name, style)?;
                Ok(font.string_units(&encode_winansi(text)) * size)
            },
        )
    }

    fn line_x(&self, line_width: i32) -> i32 {
        match self.align {
            TextAlign::Left => self.pos_x,
            TextAlign::Center => self.pos_x - line_width / 2,
            TextAlign::Right => self.pos_x - line_width,
        }
    }

    /// Compute the operators. Records the laid out height when none was set.
    pub fn build(&mut self, ctx: &LayoutContext<'_>) -> Result<ContentStreamBuilder> {
        let layout = self.layout(ctx)?;
        let line_height = layout.line_height;
        let total = layout.total_height();
        if self.height.is_none() {
            self.height = Some(total);
        }

        let first_y = match self.position {
            VerticalPosition::Top => self.pos_y,
            VerticalPosition::Bottom => self.pos_y + total - line_height,
        };

        let mut b = ContentStreamBuilder::new();
        b.begin_text().fill_color(self.color);

        let mut current_font: Option<String> = None;
        let mut previous_x = 0;
        for (i, line) in layout.lines.iter().enumerate() {
            let x = self.line_x(line.width());
            if i == 0 {
                b.move_text(x as f64, first_y as f64);
            } else {
                b.move_text((x - previous_x) as f64, -line_height as f64);
            }
            previous_x = x;

            for run in &line.runs {
                let (id, _) = ctx.font(&self.font_name, run.style)?;
                if current_font.as_deref() != Some(id.as_str()) {
                    b.set_font(&id, self.font_size as f64);
                    current_font = Some(id);
                }
                b.show_text(encode_winansi(&run.text));
            }
        }
        b.end_text();
        Ok(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::font_manager::Font;

    fn fonts() -> Vec<Font> {
        Font::standard_family("Helvetica").unwrap()
    }

    fn render(text_box: &mut TextBox, fonts: &[Font]) -> String {
        let ctx = LayoutContext::new(595, 842, fonts, &[]);
        String::from_utf8(text_box.build(&ctx).unwrap().build().unwrap()).unwrap()
    }

    fn first_move(out: &str) -> &str {
        out.lines().find(|l| l.ends_with(" Td")).unwrap()
    }

    #[test]
    fn test_alignment_offsets() {
        let fonts = fonts();
        for (align, expected) in [
            (TextAlign::Left, "200 200 Td"),
            (TextAlign::Right, "134 200 Td"),
            (TextAlign::Center, "167 200 Td"),
        ] {
            let mut tb = TextBox::new("This is test text", 200, 200)
                .with_font("Helvetica", 10)
                .with_align(align);
            let out = render(&mut tb, &fonts);
            assert_eq!(first_move(&out), expected, "{:?}", align);
        }
    }

    #[test]
    fn test_stream_shape() {
        let fonts = fonts();
        let mut tb = TextBox::new("Hi (there)", 50, 700).with_font("Helvetica", 12);
        let out = render(&mut tb, &fonts);
        assert_eq!(out, "BT\n0 0 0 rg\n50 700 Td\n/F1 12 Tf\n(Hi \\(there\\)) Tj\nET");
    }

    #[test]
    fn test_height_recorded_after_layout() {
        let fonts = fonts();
        let mut tb = TextBox::new("one\ntwo\nthree", 50, 700).with_font("Helvetica", 10);
        render(&mut tb, &fonts);
        assert_eq!(tb.height, Some(36));
    }

    #[test]
    fn test_bottom_position_shifts_first_line() {
        let fonts = fonts();
        let mut tb = TextBox::new("a\nb\nc", 50, 100).with_font("Helvetica", 10);
        tb.position = VerticalPosition::Bottom;
        let out = render(&mut tb, &fonts);
        assert_eq!(first_move(&out), "50 124 Td");
        assert!(out.contains("0 -12 Td"));
    }

    #[test]
    fn test_right_aligned_lines_move_relative() {
        let fonts = fonts();
        // "ii" is 444 units, "mm" 1666 at 10pt: 4pt and 16pt.
        let mut tb = TextBox::new("ii\nmm", 300, 500)
            .with_font("Helvetica", 10)
            .with_align(TextAlign::Right);
        let out = render(&mut tb, &fonts);
        let moves: Vec<&str> = out.lines().filter(|l| l.ends_with(" Td")).collect();
        assert_eq!(moves, vec!["296 500 Td", "-12 -12 Td"]);
    }

    #[test]
    fn test_font_switch_on_markers() {
        let fonts = fonts();
        let mut tb = TextBox::new("a <b>b</b> c", 10, 10).with_font("Helvetica", 10);
        let out = render(&mut tb, &fonts);
        let switches: Vec<&str> = out.lines().filter(|l| l.ends_with(" Tf")).collect();
        assert_eq!(switches, vec!["/F1 10 Tf", "/F2 10 Tf", "/F1 10 Tf"]);
    }

    #[test]
    fn test_out_of_bounds() {
        let fonts = fonts();
        let ctx = LayoutContext::new(595, 842, &fonts, &[]);
        let mut tb = TextBox::new("x", 10, 900);
        assert!(matches!(
            tb.build(&ctx),
            Err(Error::OutOfBounds { axis: "y", value: 900, limit: 842 })
        ));
        let mut tb = TextBox::new("x", -1, 10);
        assert!(matches!(tb.build(&ctx), Err(Error::OutOfBounds { axis: "x", .. })));
    }

    #[test]
    fn test_negative_explicit_width() {
        let fonts = fonts();
        let ctx = LayoutContext::new(595, 842, &fonts, &[]);
        let mut tb = TextBox::new("x", 10, 10).with_width(-5);
        assert!(matches!(tb.build(&ctx), Err(Error::NegativeWidth(-5))));
    }

    #[test]
    fn test_derived_widths() {
        let ctx = LayoutContext::new(595, 842, &[], &[]);
        let tb = TextBox::new("x", 100, 10);
        assert_eq!(tb.available_width(&ctx).unwrap(), 495);
        assert_eq!(tb.clone().with_align(TextAlign::Right).available_width(&ctx).unwrap(), 100);
        assert_eq!(tb.with_align(TextAlign::Center).available_width(&ctx).unwrap(), 200);
    }

    #[test]
    fn test_missing_font_is_error() {
        let ctx = LayoutContext::new(595, 842, &[], &[]);
        let mut tb = TextBox::new("x", 10, 10).with_font("Garamond", 10);
        assert!(matches!(tb.build(&ctx), Err(Error::FontNotFound(_))));
    }
}
