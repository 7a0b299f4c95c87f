//! TrueType inspection for embedded fonts.
//!
//! Wraps `ttf-parser` to read what a simple WinAnsi TrueType font needs in
//! PDF: advance widths for codes 32..=255 and the font descriptor values.
//! The font program itself is embedded unchanged.

use ttf_parser::Face;

use crate::error::{Error, Result};
use crate::fonts::encoding::winansi_to_char;

/// First character code covered by `/Widths`.
pub const FIRST_CHAR: u8 = 32;
/// Last character code covered by `/Widths`.
pub const LAST_CHAR: u8 = 255;

/// Font descriptor flag: all glyphs have the same width.
const FLAG_FIXED_PITCH: u32 = 1 << 0;
/// Font descriptor flag: Latin text font.
const FLAG_NONSYMBOLIC: u32 = 1 << 5;
/// Font descriptor flag: italic.
const FLAG_ITALIC: u32 = 1 << 6;

/// Metrics of an embedded TrueType font, in thousandths of an em.
#[derive(Debug, Clone, PartialEq)]
pub struct TrueTypeMetrics {
    /// PostScript name from the `name` table
    pub postscript_name: Option<String>,
    /// Font descriptor `/Flags`
    pub flags: u32,
    /// Font bounding box `[llx lly urx ury]`
    pub bbox: [i32; 4],
    /// Typographic ascent
    pub ascent: i32,
    /// Typographic descent (negative)
    pub descent: i32,
    /// Height of capital letters
    pub cap_height: i32,
    /// Estimated vertical stem width
    pub stem_v: i32,
    /// Whether the face is italic
    pub italic: bool,
    /// Advance widths for codes `FIRST_CHAR..=LAST_CHAR`
    pub widths: Vec<u16>,
}

impl TrueTypeMetrics {
    /// Parse font bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::Font("font file is empty".to_string()));
        }
        let face = Face::parse(data, 0).map_err(|e| Error::Font(e.to_string()))?;
        let units_per_em = face.units_per_em().max(1) as i32;
        let scale = |v: i16| v as i32 * 1000 / units_per_em;

        let missing = face
            .glyph_index(' ')
            .and_then(|gid| face.glyph_hor_advance(gid))
            .unwrap_or(0);
        let widths = (FIRST_CHAR..=LAST_CHAR)
            .map(|code| {
                let advance = winansi_to_char(code)
                    .and_then(|ch| face.glyph_index(ch))
                    .and_then(|gid| face.glyph_hor_advance(gid))
                    .unwrap_or(missing);
                (advance as u32 * 1000 / units_per_em as u32) as u16
            })
            .collect();

        let mut flags = FLAG_NONSYMBOLIC;
        if face.is_monospaced() {
            flags |= FLAG_FIXED_PITCH;
        }
        if face.is_italic() {
            flags |= FLAG_ITALIC;
        }

        let bbox = face.global_bounding_box();
        let postscript_name = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .find_map(|name| name.to_string());

        Ok(Self {
            postscript_name,
            flags,
            bbox: [
                scale(bbox.x_min),
                scale(bbox.y_min),
                scale(bbox.x_max),
                scale(bbox.y_max),
            ],
            ascent: scale(face.ascender()),
            descent: scale(face.descender()),
            cap_height: scale(face.capital_height().unwrap_or_else(|| face.ascender())),
            // TrueType carries no stem width; estimate it from the weight.
            stem_v: if face.is_bold() { 140 } else { 80 },
            italic: face.is_italic(),
            widths,
        })
    }

    /// Width of a WinAnsi code.
    pub fn width(&self, code: u8) -> u16 {
        if code < FIRST_CHAR {
            return 0;
        }
        self.widths
            .get((code - FIRST_CHAR) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// `/ItalicAngle` for the descriptor.
    pub fn italic_angle(&self) -> i32 {
        if self.italic {
            -12
        } else {
            0
        }
    }
}
