//! PDF content stream builder.
//!
//! Content primitives describe their drawing as a list of
//! [`ContentStreamOp`]s; the builder turns the list into stream bytes, one
//! operator per line.

use std::io::Write;

use crate::error::Result;
use crate::layout::Color;
use crate::writer::object_serializer::{escape_literal, format_number};

/// Operations that can be added to a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentStreamOp {
    /// Save graphics state (q)
    SaveState,
    /// Restore graphics state (Q)
    RestoreState,
    /// Set transformation matrix (cm)
    Transform(f64, f64, f64, f64, f64, f64),
    /// Begin text object (BT)
    BeginText,
    /// End text object (ET)
    EndText,
    /// Set font resource and size (Tf)
    SetFont(String, f64),
    /// Move text position (Td)
    MoveText(f64, f64),
    /// Show text (Tj); bytes are already in the font encoding
    ShowText(Vec<u8>),
    /// Set fill color RGB (rg)
    SetFillColorRGB(f64, f64, f64),
    /// Set stroke color RGB (RG)
    SetStrokeColorRGB(f64, f64, f64),
    /// Set line width (w)
    SetLineWidth(f64),
    /// Set dash pattern (d); an empty array is a solid line
    SetDashPattern(Vec<f64>, f64),
    /// Move to (m)
    MoveTo(f64, f64),
    /// Line to (l)
    LineTo(f64, f64),
    /// Curve to (c)
    CurveTo(f64, f64, f64, f64, f64, f64),
    /// Rectangle (re)
    Rectangle(f64, f64, f64, f64),
    /// Close path (h)
    ClosePath,
    /// Stroke (S)
    Stroke,
    /// Fill and stroke (B)
    FillStroke,
    /// Paint XObject (Do)
    PaintXObject(String),
}

/// Builder for PDF content streams.
#[derive(Debug, Clone, Default)]
pub struct ContentStreamBuilder {
    operations: Vec<ContentStreamOp>,
}

impl ContentStreamBuilder {
    /// Create a new content stream builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an operation to the stream.
    pub fn op(&mut self, op: ContentStreamOp) -> &mut Self {
        self.operations.push(op);
        self
    }

    /// Add multiple operations.
    pub fn ops(&mut self, ops: impl IntoIterator<Item = ContentStreamOp>) -> &mut Self {
        self.operations.extend(ops);
        self
    }

    /// Consume the builder, returning its operations.
    pub fn into_ops(self) -> Vec<ContentStreamOp> {
        self.operations
    }

    /// Whether nothing was added.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Begin a text object.
    pub fn begin_text(&mut self) -> &mut Self {
        self.op(ContentStreamOp::BeginText)
    }

    /// End a text object.
    pub fn end_text(&mut self) -> &mut Self {
        self.op(ContentStreamOp::EndText)
    }

    /// Select a font resource by id.
    pub fn set_font(&mut self, font_id: &str, size: f64) -> &mut Self {
        self.op(ContentStreamOp::SetFont(font_id.to_string(), size))
    }

    /// Move the text position relative to the start of the current line.
    pub fn move_text(&mut self, tx: f64, ty: f64) -> &mut Self {
        self.op(ContentStreamOp::MoveText(tx, ty))
    }

    /// Show already-encoded text.
    pub fn show_text(&mut self, encoded: Vec<u8>) -> &mut Self {
        self.op(ContentStreamOp::ShowText(encoded))
    }

    /// Set the fill color.
    pub fn fill_color(&mut self, color: Color) -> &mut Self {
        let (r, g, b) = color.components();
        self.op(ContentStreamOp::SetFillColorRGB(r, g, b))
    }

    /// Set the stroke color.
    pub fn stroke_color(&mut self, color: Color) -> &mut Self {
        let (r, g, b) = color.components();
        self.op(ContentStreamOp::SetStrokeColorRGB(r, g, b))
    }

    /// Set line width.
    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.op(ContentStreamOp::SetLineWidth(width))
    }

    /// Set a dash pattern.
    pub fn set_dash_pattern(&mut self, pattern: Vec<f64>, phase: f64) -> &mut Self {
        self.op(ContentStreamOp::SetDashPattern(pattern, phase))
    }

    /// Reset to a solid line.
    pub fn set_solid_line(&mut self) -> &mut Self {
        self.set_dash_pattern(Vec::new(), 0.0)
    }

    /// Begin a new subpath.
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(ContentStreamOp::MoveTo(x, y))
    }

    /// Append a straight segment.
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(ContentStreamOp::LineTo(x, y))
    }

    /// Append a cubic bezier segment.
    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        self.op(ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3))
    }

    /// Append a rectangle.
    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(ContentStreamOp::Rectangle(x, y, width, height))
    }

    /// Close the current subpath.
    pub fn close_path(&mut self) -> &mut Self {
        self.op(ContentStreamOp::ClosePath)
    }

    /// Stroke the path.
    pub fn stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::Stroke)
    }

    /// Fill and stroke the path.
    pub fn fill_stroke(&mut self) -> &mut Self {
        self.op(ContentStreamOp::FillStroke)
    }

    /// Save graphics state.
    pub fn save_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::SaveState)
    }

    /// Restore graphics state.
    pub fn restore_state(&mut self) -> &mut Self {
        self.op(ContentStreamOp::RestoreState)
    }

    /// Concatenate a matrix onto the CTM.
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        self.op(ContentStreamOp::Transform(a, b, c, d, e, f))
    }

    /// Paint an image XObject scaled into the given box.
    pub fn draw_image(&mut self, image_id: &str, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.save_state()
            .transform(width, 0.0, 0.0, height, x, y)
            .op(ContentStreamOp::PaintXObject(image_id.to_string()))
            .restore_state()
    }

    /// Build the content stream to bytes.
    ///
    /// Every operator is terminated by a newline except the last one.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();

        for (i, op) in self.operations.iter().enumerate() {
            if i > 0 {
                writeln!(buf)?;
            }
            write_op(&mut buf, op)?;
        }

        Ok(buf)
    }
}

/// Write a single operation.
fn write_op<W: Write>(w: &mut W, op: &ContentStreamOp) -> std::io::Result<()> {
    let n = format_number;
    match op {
        ContentStreamOp::SaveState => write!(w, "q"),
        ContentStreamOp::RestoreState => write!(w, "Q"),
        ContentStreamOp::Transform(a, b, c, d, e, f) => {
            write!(w, "{} {} {} {} {} {} cm", n(*a), n(*b), n(*c), n(*d), n(*e), n(*f))
        },
        ContentStreamOp::BeginText => write!(w, "BT"),
        ContentStreamOp::EndText => write!(w, "ET"),
        ContentStreamOp::SetFont(name, size) => write!(w, "/{} {} Tf", name, n(*size)),
        ContentStreamOp::MoveText(tx, ty) => write!(w, "{} {} Td", n(*tx), n(*ty)),
        ContentStreamOp::ShowText(bytes) => {
            w.write_all(b"(")?;
            w.write_all(&escape_literal(bytes))?;
            w.write_all(b") Tj")
        },
        ContentStreamOp::SetFillColorRGB(r, g, b) => write!(w, "{} {} {} rg", n(*r), n(*g), n(*b)),
        ContentStreamOp::SetStrokeColorRGB(r, g, b) => {
            write!(w, "{} {} {} RG", n(*r), n(*g), n(*b))
        },
        ContentStreamOp::SetLineWidth(width) => write!(w, "{} w", n(*width)),
        ContentStreamOp::SetDashPattern(pattern, phase) => {
            let parts: Vec<String> = pattern.iter().map(|p| n(*p)).collect();
            write!(w, "[{}] {} d", parts.join(" "), n(*phase))
        },
        ContentStreamOp::MoveTo(x, y) => write!(w, "{} {} m", n(*x), n(*y)),
        ContentStreamOp::LineTo(x, y) => write!(w, "{} {} l", n(*x), n(*y)),
        ContentStreamOp::CurveTo(x1, y1, x2, y2, x3, y3) => write!(
            w,
            "{} {} {} {} {} {} c",
            n(*x1),
            n(*y1),
            n(*x2),
            n(*y2),
            n(*x3),
            n(*y3)
        ),
        ContentStreamOp::Rectangle(x, y, width, height) => {
            write!(w, "{} {} {} {} re", n(*x), n(*y), n(*width), n(*height))
        },
        ContentStreamOp::ClosePath => write!(w, "h"),
        ContentStreamOp::Stroke => write!(w, "S"),
        ContentStreamOp::FillStroke => write!(w, "B"),
        ContentStreamOp::PaintXObject(name) => write!(w, "/{} Do", name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(builder: &ContentStreamBuilder) -> String {
        String::from_utf8(builder.build().unwrap()).unwrap()
    }

    #[test]
    fn test_simple_text() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .begin_text()
            .set_font("F1", 12.0)
            .move_text(100.0, 700.0)
            .show_text(b"Hello".to_vec())
            .end_text();

        assert_eq!(render(&builder), "BT\n/F1 12 Tf\n100 700 Td\n(Hello) Tj\nET");
    }

    #[test]
    fn test_escaped_text() {
        let mut builder = ContentStreamBuilder::new();
        builder.show_text(b"a(b)c\\".to_vec());
        assert_eq!(render(&builder), "(a\\(b\\)c\\\\) Tj");
    }

    #[test]
    fn test_path_operations() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .stroke_color(Color::black())
            .set_line_width(1.5)
            .set_solid_line()
            .move_to(0.0, 0.0)
            .line_to(100.0, 100.0)
            .stroke();

        let content = render(&builder);
        assert_eq!(content, "0 0 0 RG\n1.5 w\n[] 0 d\n0 0 m\n100 100 l\nS");
    }

    #[test]
    fn test_dash_pattern() {
        let mut builder = ContentStreamBuilder::new();
        builder.set_dash_pattern(vec![3.0, 2.0], 0.0);
        assert_eq!(render(&builder), "[3 2] 0 d");
    }

    #[test]
    fn test_rectangle_and_curve() {
        let mut builder = ContentStreamBuilder::new();
        builder
            .rect(100.0, 100.0, 200.0, 100.0)
            .curve_to(1.0, 2.0, 3.0, 4.0, 5.0, 6.0)
            .close_path()
            .fill_stroke();
        assert_eq!(render(&builder), "100 100 200 100 re\n1 2 3 4 5 6 c\nh\nB");
    }

    #[test]
    fn test_draw_image() {
        let mut builder = ContentStreamBuilder::new();
        builder.draw_image("I1", 50.0, 60.0, 120.0, 80.0);
        assert_eq!(render(&builder), "q\n120 0 0 80 50 60 cm\n/I1 Do\nQ");
    }

    #[test]
    fn test_fill_color_components() {
        let mut builder = ContentStreamBuilder::new();
        builder.fill_color(Color::new(255, 128, 0));
        assert_eq!(render(&builder), "1 0.5 0 rg");
    }

    #[test]
    fn test_empty_builder() {
        let builder = ContentStreamBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.build().unwrap().is_empty());
    }
}
