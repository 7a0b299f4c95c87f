//! Vector shapes.
//!
//! Rounded corners and ellipses are drawn as four cubic bezier quadrants.
//! Control points sit `radius * BEZIER_K` away from the quadrant ends,
//! truncated to whole points.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::Color;
use crate::object::PdfObject;
use crate::writer::content_stream::ContentStreamBuilder;

/// Control point ratio of a quarter-circle cubic bezier.
pub const BEZIER_K: f64 = 0.55191502449;

fn default_line_width() -> f64 {
    1.0
}

/// Geometry of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Rectangle anchored at its lower-left corner
    #[default]
    Rectangle,
    /// Ellipse centered on the anchor
    Ellipse,
    /// Segment from the anchor to anchor + (width, height)
    Line,
}

/// Stroked and optionally filled path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shape {
    /// Geometry
    #[serde(rename = "shape", default)]
    pub kind: ShapeKind,
    /// Anchor X
    pub pos_x: i32,
    /// Anchor Y
    pub pos_y: i32,
    /// Paint order
    #[serde(default)]
    pub z_index: i32,
    /// Width (line: X extent)
    #[serde(default)]
    pub width: i32,
    /// Height (line: Y extent)
    #[serde(default)]
    pub height: i32,
    /// Corner radius of rectangles
    #[serde(default)]
    pub border_radius: i32,
    /// Stroke width
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// Dash lengths; empty is solid
    #[serde(default)]
    pub dash: Vec<f64>,
    /// Stroke color, black when unset
    #[serde(default)]
    pub stroke_color: Option<Color>,
    /// Fill color; unfilled when unset
    #[serde(default)]
    pub fill_color: Option<Color>,
    /// PDF object state
    #[serde(skip)]
    pub object: PdfObject,
}

impl Shape {
    fn new(kind: ShapeKind, pos_x: i32, pos_y: i32, width: i32, height: i32) -> Self {
        Self {
            kind,
            pos_x,
            pos_y,
            z_index: 0,
            width,
            height,
            border_radius: 0,
            line_width: default_line_width(),
            dash: Vec::new(),
            stroke_color: None,
            fill_color: None,
            object: PdfObject::default(),
        }
    }

    /// Rectangle with its lower-left corner at `(x, y)`.
    pub fn rectangle(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(ShapeKind::Rectangle, x, y, width, height)
    }

    /// Ellipse centered at `(cx, cy)` with the given bounding size.
    pub fn ellipse(cx: i32, cy: i32, width: i32, height: i32) -> Self {
        Self::new(ShapeKind::Ellipse, cx, cy, width, height)
    }

    /// Line from `(x, y)` to `(x + dx, y + dy)`.
    pub fn line(x: i32, y: i32, dx: i32, dy: i32) -> Self {
        Self::new(ShapeKind::Line, x, y, dx, dy)
    }

    /// Set the corner radius.
    pub fn with_radius(mut self, radius: i32) -> Self {
        self.border_radius = radius;
        self
    }

    /// Set the fill color.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill_color = Some(color);
        self
    }

    /// Set stroke color and width.
    pub fn with_stroke(mut self, color: Color, line_width: f64) -> Self {
        self.stroke_color = Some(color);
        self.line_width = line_width;
        self
    }

    /// Compute the operators.
    pub fn build(&self) -> Result<ContentStreamBuilder> {
        let mut b = ContentStreamBuilder::new();
        b.set_line_width(self.line_width)
            .set_dash_pattern(self.dash.clone(), 0.0)
            .stroke_color(self.stroke_color.unwrap_or_else(Color::black));
        if let Some(fill) = self.fill_color {
            b.fill_color(fill);
        }

        match self.kind {
            ShapeKind::Rectangle if self.border_radius == 0 => {
                b.rect(
                    self.pos_x as f64,
                    self.pos_y as f64,
                    self.width as f64,
                    self.height as f64,
                );
                self.paint(&mut b);
            },
            ShapeKind::Rectangle => {
                self.rounded_rect(&mut b);
                b.close_path();
                self.paint(&mut b);
            },
            ShapeKind::Ellipse => {
                self.ellipse_path(&mut b);
                b.close_path();
                self.paint(&mut b);
            },
            ShapeKind::Line => {
                b.move_to(self.pos_x as f64, self.pos_y as f64)
                    .line_to((self.pos_x + self.width) as f64, (self.pos_y + self.height) as f64)
                    .stroke();
            },
        }
        Ok(b)
    }

    fn paint(&self, b: &mut ContentStreamBuilder) {
        if self.fill_color.is_some() {
            b.fill_stroke();
        } else {
            b.stroke();
        }
    }

    fn rounded_rect(&self, b: &mut ContentStreamBuilder) {
        let (x, y, w, h, r) = (self.pos_x, self.pos_y, self.width, self.height, self.border_radius);
        let kr = (r as f64 * BEZIER_K) as i32;
        let p = |v: i32| v as f64;

        b.move_to(p(x), p(y + r))
            .line_to(p(x), p(y + h - r))
            .curve_to(p(x), p(y + h - r + kr), p(x + r - kr), p(y + h), p(x + r), p(y + h))
            .line_to(p(x + w - r), p(y + h))
            .curve_to(p(x + w - r + kr), p(y + h), p(x + w), p(y + h - r + kr), p(x + w), p(y + h - r))
            .line_to(p(x + w), p(y + r))
            .curve_to(p(x + w), p(y + r - kr), p(x + w - r + kr), p(y), p(x + w - r), p(y))
            .line_to(p(x + r), p(y))
            .curve_to(p(x + r - kr), p(y), p(x), p(y + r - kr), p(x), p(y + r));
    }

    fn ellipse_path(&self, b: &mut ContentStreamBuilder) {
        let (cx, cy) = (self.pos_x, self.pos_y);
        let (rx, ry) = (self.width / 2, self.height / 2);
        let kx = (rx as f64 * BEZIER_K) as i32;
        let ky = (ry as f64 * BEZIER_K) as i32;
        let p = |v: i32| v as f64;

        b.move_to(p(cx), p(cy - ry))
            .curve_to(p(cx - kx), p(cy - ry), p(cx - rx), p(cy - ky), p(cx - rx), p(cy))
            .curve_to(p(cx - rx), p(cy + ky), p(cx - kx), p(cy + ry), p(cx), p(cy + ry))
            .curve_to(p(cx + kx), p(cy + ry), p(cx + rx), p(cy + ky), p(cx + rx), p(cy))
            .curve_to(p(cx + rx), p(cy - ky), p(cx + kx), p(cy - ry), p(cx), p(cy - ry));
    }
}
