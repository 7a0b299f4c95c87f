//! Tables.
//!
//! A table does not draw by itself. Each cell becomes a [`TextBox`] or an
//! [`Image`], each cell border a [`Shape`] line, and the table stream is the
//! concatenation of their operators. Rows are laid out top-down from the
//! anchor; a row is as tall as its tallest cell content plus padding.

use serde::{Deserialize, Serialize};

use super::{default_font_name, default_font_size, Image, Shape, TextBox};
use crate::error::Result;
use crate::layout::{Color, LayoutContext, TextAlign};
use crate::object::PdfObject;
use crate::writer::content_stream::ContentStreamBuilder;

fn default_padding() -> i32 {
    2
}

fn default_border_width() -> f64 {
    1.0
}

/// Stroke of one cell edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Line width
    #[serde(default = "default_border_width")]
    pub width: f64,
    /// Line color
    #[serde(default)]
    pub color: Color,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            width: default_border_width(),
            color: Color::black(),
        }
    }
}

/// Optional stroke per cell edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CellBorders {
    /// Top edge
    #[serde(default)]
    pub top: Option<Border>,
    /// Bottom edge
    #[serde(default)]
    pub bottom: Option<Border>,
    /// Left edge
    #[serde(default)]
    pub left: Option<Border>,
    /// Right edge
    #[serde(default)]
    pub right: Option<Border>,
}

impl CellBorders {
    /// The same border on all four edges.
    pub fn all(border: Border) -> Self {
        Self {
            top: Some(border),
            bottom: Some(border),
            left: Some(border),
            right: Some(border),
        }
    }

    fn draw(
        &self,
        b: &mut ContentStreamBuilder,
        x: i32,
        bottom: i32,
        width: i32,
        height: i32,
    ) -> Result<()> {
        let edges = [
            (self.top, x, bottom + height, width, 0),
            (self.bottom, x, bottom, width, 0),
            (self.left, x, bottom, 0, height),
            (self.right, x + width, bottom, 0, height),
        ];
        for (border, x, y, dx, dy) in edges {
            if let Some(border) = border {
                let line = Shape::line(x, y, dx, dy).with_stroke(border.color, border.width);
                b.ops(line.build()?.into_ops());
            }
        }
        Ok(())
    }
}

/// One cell: text, an image, or nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableCell {
    /// Text content
    #[serde(default)]
    pub text: Option<String>,
    /// Image resource name; takes precedence over text
    #[serde(default)]
    pub image: Option<String>,
    /// Drawn image height; square when unset
    #[serde(default)]
    pub image_height: Option<i32>,
    /// Text alignment inside the cell
    #[serde(default)]
    pub align: TextAlign,
    /// Overrides the table font family
    #[serde(default)]
    pub font_name: Option<String>,
    /// Overrides the table font size
    #[serde(default)]
    pub font_size: Option<i32>,
    /// Edge strokes
    #[serde(default)]
    pub borders: CellBorders,
}

impl TableCell {
    /// Text cell.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// Image cell.
    pub fn image(name: impl Into<String>, height: Option<i32>) -> Self {
        Self {
            image: Some(name.into()),
            image_height: height,
            ..Default::default()
        }
    }

    /// Set the alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Set the edge strokes.
    pub fn with_borders(mut self, borders: CellBorders) -> Self {
        self.borders = borders;
        self
    }
}

/// Row of cells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells left to right
    #[serde(default)]
    pub columns: Vec<TableCell>,
    /// Lower bound of the row height
    #[serde(default)]
    pub min_height: Option<i32>,
}

impl TableRow {
    /// Row from cells.
    pub fn new(columns: Vec<TableCell>) -> Self {
        Self {
            columns,
            min_height: None,
        }
    }

    /// Set the minimum height.
    pub fn with_min_height(mut self, height: i32) -> Self {
        self.min_height = Some(height);
        self
    }
}

/// Grid of text and image cells anchored at its top-left corner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Left edge
    pub pos_x: i32,
    /// Top edge
    pub pos_y: i32,
    /// Paint order
    #[serde(default)]
    pub z_index: i32,
    /// Total width
    pub width: i32,
    /// Per-column widths; unset columns share what is left
    #[serde(default)]
    pub column_widths: Vec<Option<i32>>,
    /// Space between cell edges and content
    #[serde(default = "default_padding")]
    pub cell_padding: i32,
    /// Default font family of text cells
    #[serde(default = "default_font_name")]
    pub font_name: String,
    /// Default font size of text cells
    #[serde(default = "default_font_size")]
    pub font_size: i32,
    /// Text color
    #[serde(default)]
    pub color: Color,
    /// Rows top to bottom
    #[serde(default)]
    pub rows: Vec<TableRow>,
    /// Sum of the row heights, known after layout
    #[serde(skip)]
    pub height: Option<i32>,
    /// PDF object state
    #[serde(skip)]
    pub object: PdfObject,
}

impl Table {
    /// Empty table.
    pub fn new(pos_x: i32, pos_y: i32, width: i32) -> Self {
        Self {
            pos_x,
            pos_y,
            z_index: 0,
            width,
            column_widths: Vec::new(),
            cell_padding: default_padding(),
            font_name: default_font_name(),
            font_size: default_font_size(),
            color: Color::black(),
            rows: Vec::new(),
            height: None,
            object: PdfObject::default(),
        }
    }

    /// Set explicit column widths.
    pub fn with_column_widths(mut self, widths: Vec<Option<i32>>) -> Self {
        self.column_widths = widths;
        self
    }

    /// Set the default font.
    pub fn with_font(mut self, font_name: impl Into<String>, font_size: i32) -> Self {
        self.font_name = font_name.into();
        self.font_size = font_size;
        self
    }

    /// Append a row.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Number of columns.
    pub fn num_columns(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.columns.len())
            .max()
            .unwrap_or(0)
            .max(self.column_widths.len())
    }

    /// Width of every column.
    pub fn resolved_column_widths(&self) -> Vec<i32> {
        let count = self.num_columns();
        let explicit: i32 = self.column_widths.iter().flatten().sum();
        let unset = (0..count)
            .filter(|&i| self.column_widths.get(i).copied().flatten().is_none())
            .count() as i32;
        let shared = if unset > 0 {
            ((self.width - explicit) / unset).max(0)
        } else {
            0
        };
        (0..count)
            .map(|i| self.column_widths.get(i).copied().flatten().unwrap_or(shared))
            .collect()
    }

    /// Names of the images drawn in cells.
    pub fn image_names(&self) -> Vec<&str> {
        self.rows
            .iter()
            .flat_map(|r| r.columns.iter())
            .filter_map(|c| c.image.as_deref())
            .collect()
    }

    /// Compute the operators. Records the table height.
    pub fn build(&mut self, ctx: &LayoutContext<'_>) -> Result<ContentStreamBuilder> {
        let widths = self.resolved_column_widths();
        let pad = self.cell_padding;
        let mut b = ContentStreamBuilder::new();
        let mut borders = ContentStreamBuilder::new();

        let mut row_top = self.pos_y;
        for row in &self.rows {
            let mut content_height = 0;
            let mut x = self.pos_x;
            let mut cells = Vec::with_capacity(row.columns.len());
            for (cell, &cell_width) in row.columns.iter().zip(&widths) {
                let height = self.build_cell(&mut b, ctx, cell, x, row_top, cell_width)?;
                content_height = content_height.max(height);
                cells.push((x, cell_width, cell.borders));
                x += cell_width;
            }

            let mut row_height = content_height + 2 * pad;
            if let Some(min_height) = row.min_height {
                row_height = row_height.max(min_height);
            }
            let bottom = row_top - row_height;
            for (x, cell_width, cell_borders) in cells {
                cell_borders.draw(&mut borders, x, bottom, cell_width, row_height)?;
            }
            row_top = bottom;
        }

        b.ops(borders.into_ops());
        self.height = Some(self.pos_y - row_top);
        Ok(b)
    }

    /// Draw one cell's content and return its height.
    fn build_cell(
        &self,
        b: &mut ContentStreamBuilder,
        ctx: &LayoutContext<'_>,
        cell: &TableCell,
        x: i32,
        row_top: i32,
        cell_width: i32,
    ) -> Result<i32> {
        let pad = self.cell_padding;
        let inner = (cell_width - 2 * pad).max(0);

        if let Some(name) = &cell.image {
            let height = cell.image_height.unwrap_or(inner);
            let image = Image::new(name.clone(), x + pad, row_top - pad - height)
                .with_size(inner, height);
            b.ops(image.build(ctx)?.into_ops());
            return Ok(height);
        }

        let text = match &cell.text {
            Some(text) if !text.is_empty() => text,
            _ => return Ok(0),
        };
        let font_size = cell.font_size.unwrap_or(self.font_size);
        let font_name = cell.font_name.as_deref().unwrap_or(&self.font_name);
        let anchor = match cell.align {
            TextAlign::Left => x + pad,
            TextAlign::Center => x + cell_width / 2,
            TextAlign::Right => x + cell_width - pad,
        };

        let mut text_box = TextBox::new(text.clone(), anchor, row_top - pad - font_size)
            .with_font(font_name, font_size)
            .with_align(cell.align)
            .with_width(inner);
        text_box.color = self.color;
        b.ops(text_box.build(ctx)?.into_ops());
        Ok(text_box.height.unwrap_or(0))
    }
}
