//! Greedy line wrapping with inline style markers.
//!
//! Text is split into paragraphs on `\n` and into words on spaces. The
//! markers `<b>`, `</b>`, `<i>` and `</i>` (any case) switch the bold and
//! italic state; they never reach the output and the state carries across
//! words and paragraphs.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Result;

lazy_static! {
    static ref STYLE_MARKER: Regex = Regex::new(r"(?i)</?[bi]>").unwrap();
}

/// Bold/italic state of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct FontStyle {
    /// Bold face requested
    pub bold: bool,
    /// Italic face requested
    pub italic: bool,
}

impl FontStyle {
    /// Create a style.
    pub fn new(bold: bool, italic: bool) -> Self {
        Self { bold, italic }
    }

    fn apply_marker(&mut self, marker: &str) {
        let closing = marker.starts_with("</");
        match marker.as_bytes()[marker.len() - 2].to_ascii_lowercase() {
            b'b' => self.bold = !closing,
            _ => self.italic = !closing,
        }
    }
}

/// Text drawn with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledRun {
    /// Style of the run
    pub style: FontStyle,
    /// Text of the run
    pub text: String,
}

/// One rendered line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LayoutLine {
    /// Runs in drawing order
    pub runs: Vec<StyledRun>,
    /// Sum of glyph widths times the font size (thousandths of a point)
    pub units: u64,
}

impl LayoutLine {
    /// Measured width in points.
    pub fn width(&self) -> i32 {
        (self.units / 1000) as i32
    }

    /// Whether the line carries no text.
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn push(&mut self, style: FontStyle, text: &str) {
        match self.runs.last_mut() {
            Some(run) if run.style == style => run.text.push_str(text),
            _ => self.runs.push(StyledRun {
                style,
                text: text.to_string(),
            }),
        }
    }
}

/// Result of wrapping a text block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextLayout {
    /// Lines top to bottom
    pub lines: Vec<LayoutLine>,
    /// Distance between baselines
    pub line_height: i32,
}

impl TextLayout {
    /// Height of all lines.
    pub fn total_height(&self) -> i32 {
        self.lines.len() as i32 * self.line_height
    }
}

/// Split a word into styled pieces, updating `style` as markers are passed.
fn split_word(word: &str, style: &mut FontStyle) -> Vec<(FontStyle, String)> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for marker in STYLE_MARKER.find_iter(word) {
        if marker.start() > last {
            pieces.push((*style, word[last..marker.start()].to_string()));
        }
        style.apply_marker(marker.as_str());
        last = marker.end();
    }
    if last < word.len() {
        pieces.push((*style, word[last..].to_string()));
    }
    pieces
}

/// Wrap `text` into lines no wider than `available_width`.
///
/// `measure` returns the width of a string in a style as glyph units times
/// font size. A line is broken before a word that would make it wider than
/// `available_width`, unless the line is still empty. With a `fixed_height`,
/// a new line starts only while the lines so far stay below that height;
/// once the box is full the remaining words are measured but dropped.
pub fn wrap_text<F>(
    text: &str,
    available_width: i32,
    line_height: i32,
    fixed_height: Option<i32>,
    mut measure: F,
) -> Result<TextLayout>
where
    F: FnMut(&str, FontStyle) -> Result<u64>,
{
    let mut lines: Vec<LayoutLine> = Vec::new();
    let mut style = FontStyle::default();
    let limit = available_width.max(0) as u64 * 1000;

    let can_start_line = |lines: &Vec<LayoutLine>| match fixed_height {
        Some(height) => (lines.len() as i32) * line_height < height,
        None => true,
    };

    let mut full = false;
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        if !full && can_start_line(&lines) {
            lines.push(LayoutLine::default());
        } else {
            full = true;
        }

        for word in paragraph.split(' ') {
            let pieces = split_word(word, &mut style);
            if pieces.is_empty() {
                continue;
            }

            let mut word_units = 0;
            for (piece_style, piece) in &pieces {
                word_units += measure(piece, *piece_style)?;
            }
            if full {
                continue;
            }

            let Some(line) = lines.last_mut() else {
                continue;
            };
            let space = match line.runs.last() {
                Some(run) => Some((run.style, measure(" ", run.style)?)),
                None => None,
            };
            let space_units = space.map(|(_, units)| units).unwrap_or(0);

            if line.units + space_units + word_units > limit && !line.is_empty() {
                if !can_start_line(&lines) {
                    full = true;
                    continue;
                }
                lines.push(LayoutLine::default());
            } else if let Some((space_style, units)) = space {
                line.push(space_style, " ");
                line.units += units;
            }

            if let Some(line) = lines.last_mut() {
                for (piece_style, piece) in &pieces {
                    line.push(*piece_style, piece);
                }
                line.units += word_units;
            }
        }
    }

    log::trace!("wrapped text into {} lines", lines.len());
    Ok(TextLayout { lines, line_height })
}
