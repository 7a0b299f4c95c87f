//! Font management for PDF generation.
//!
//! A document carries a table of [`Font`] faces. Standard faces are written
//! as Type1 fonts with built-in metrics; faces backed by a [`FontFile`] are
//! written as simple TrueType fonts with the program embedded.
//!
//! Every font uses `/WinAnsiEncoding`. Faces are looked up by family name
//! plus bold/italic flags, see [`find_variant`].

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fonts::encoding::encode_winansi;
use crate::fonts::metrics::standard_metrics;
use crate::fonts::truetype::{TrueTypeMetrics, FIRST_CHAR, LAST_CHAR};
use crate::object::{Dictionary, PdfObject, PdfValue};
use crate::writer::object_serializer::CountingWriter;
use crate::writer::resource::ResourceSource;

/// Resource id of the font at `index` in the document font table.
pub fn font_resource_id(index: usize) -> String {
    format!("F{}", index + 1)
}

/// One face of a font family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Font {
    /// Family name used for lookups ("Helvetica")
    pub font_name: String,
    /// PostScript name written as `/BaseFont` ("Helvetica-Bold")
    pub base_font: String,
    /// Bold face
    #[serde(default)]
    pub bold: bool,
    /// Italic face
    #[serde(default)]
    pub italic: bool,
    /// Name of the embedded [`FontFile`] backing this face
    #[serde(default)]
    pub file: Option<String>,
    /// PDF object state
    #[serde(skip)]
    pub object: PdfObject,
    #[serde(skip)]
    embedded_metrics: Option<TrueTypeMetrics>,
}

impl Font {
    /// Create a regular face.
    pub fn new(font_name: impl Into<String>, base_font: impl Into<String>) -> Self {
        Self {
            font_name: font_name.into(),
            base_font: base_font.into(),
            bold: false,
            italic: false,
            file: None,
            object: PdfObject::default(),
            embedded_metrics: None,
        }
    }

    /// Set the bold/italic flags.
    pub fn with_style(mut self, bold: bool, italic: bool) -> Self {
        self.bold = bold;
        self.italic = italic;
        self
    }

    /// Back this face with an embedded font file.
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// The four faces of a standard family: regular, bold, italic, bold italic.
    pub fn standard_family(family: &str) -> Result<Vec<Font>> {
        let faces: [&str; 4] = match family {
            "Helvetica" => [
                "Helvetica",
                "Helvetica-Bold",
                "Helvetica-Oblique",
                "Helvetica-BoldOblique",
            ],
            "Times" | "Times-Roman" => {
                ["Times-Roman", "Times-Bold", "Times-Italic", "Times-BoldItalic"]
            },
            "Courier" => ["Courier", "Courier-Bold", "Courier-Oblique", "Courier-BoldOblique"],
            _ => {
                return Err(Error::Unsupported(format!(
                    "'{}' is not a standard font family",
                    family
                )))
            },
        };
        Ok(vec![
            Font::new(family, faces[0]),
            Font::new(family, faces[1]).with_style(true, false),
            Font::new(family, faces[2]).with_style(false, true),
            Font::new(family, faces[3]).with_style(true, true),
        ])
    }

    /// Whether this face embeds a font program.
    pub fn is_embedded(&self) -> bool {
        self.file.is_some()
    }

    /// Check the face has metrics and take the widths of its font file.
    pub fn resolve_metrics(&mut self, files: &[FontFile]) -> Result<()> {
        match &self.file {
            Some(file_name) => {
                let metrics = files
                    .iter()
                    .find(|f| &f.name == file_name)
                    .and_then(|f| f.metrics())
                    .ok_or_else(|| Error::FontNotFound(format!("font file '{}'", file_name)))?;
                self.embedded_metrics = Some(metrics.clone());
            },
            None => {
                if standard_metrics(&self.base_font).is_none() {
                    return Err(Error::Unsupported(format!(
                        "'{}' is not a standard font",
                        self.base_font
                    )));
                }
            },
        }
        Ok(())
    }

    /// Width of a WinAnsi code in thousandths of an em.
    pub fn char_width(&self, code: u8) -> u16 {
        match &self.embedded_metrics {
            Some(metrics) => metrics.width(code),
            None => standard_metrics(&self.base_font)
                .map(|m| m.width(code))
                .unwrap_or(0),
        }
    }

    /// Sum of the widths of encoded text, thousandths of an em.
    pub fn string_units(&self, encoded: &[u8]) -> u64 {
        encoded.iter().map(|&b| self.char_width(b) as u64).sum()
    }

    /// Width of text at a font size, in whole points.
    pub fn string_width(&self, text: &str, font_size: i32) -> i32 {
        let units = self.string_units(&encode_winansi(text));
        (units * font_size.max(0) as u64 / 1000) as i32
    }

    /// Font dictionary. `descriptor` is the object number of the font
    /// descriptor for embedded faces.
    pub fn dictionary(&self, descriptor: Option<u32>) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.insert("Type", PdfValue::name("Font"));
        match descriptor {
            Some(descriptor) => {
                let widths = (FIRST_CHAR..=LAST_CHAR)
                    .map(|code| PdfValue::Integer(self.char_width(code) as i64))
                    .collect();
                dict.insert("Subtype", PdfValue::name("TrueType"))
                    .insert("BaseFont", PdfValue::name(self.base_font.as_str()))
                    .insert("FirstChar", PdfValue::Integer(FIRST_CHAR as i64))
                    .insert("LastChar", PdfValue::Integer(LAST_CHAR as i64))
                    .insert("Widths", PdfValue::Array(widths))
                    .insert("FontDescriptor", PdfValue::Reference(descriptor));
            },
            None => {
                dict.insert("Subtype", PdfValue::name("Type1"))
                    .insert("BaseFont", PdfValue::name(self.base_font.as_str()));
            },
        }
        dict.insert("Encoding", PdfValue::name("WinAnsiEncoding"));
        dict
    }

    /// Write the font object.
    pub fn publish<W: Write>(
        &mut self,
        w: &mut CountingWriter<W>,
        descriptor: Option<u32>,
    ) -> Result<()> {
        let dict = self.dictionary(descriptor);
        self.object.publish(w, dict)
    }
}

/// Find the face of `font_name` matching the requested style.
///
/// Falls back to the regular face of the family, then to its first face.
/// A family with no faces at all is a lookup failure.
pub fn find_variant<'a>(
    fonts: &'a [Font],
    font_name: &str,
    bold: bool,
    italic: bool,
) -> Result<(usize, &'a Font)> {
    let family = || {
        fonts
            .iter()
            .enumerate()
            .filter(move |(_, f)| f.font_name == font_name)
    };

    if let Some(found) = family().find(|(_, f)| f.bold == bold && f.italic == italic) {
        return Ok(found);
    }
    let fallback = family()
        .find(|(_, f)| !f.bold && !f.italic)
        .or_else(|| family().next())
        .ok_or_else(|| Error::FontNotFound(font_name.to_string()))?;
    log::warn!(
        "no {}{} face for font '{}', using '{}'",
        if bold { "bold" } else { "" },
        if italic { " italic" } else { "" },
        font_name,
        fallback.1.base_font
    );
    Ok(fallback)
}

/// Embedded TrueType font program.
///
/// Occupies two objects: the `/FontDescriptor` and the `/FontFile2` stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontFile {
    /// Name referenced by [`Font::file`]
    pub name: String,
    /// Where the font program is read from
    pub source: ResourceSource,
    /// Descriptor object state
    #[serde(skip)]
    pub descriptor: PdfObject,
    /// Font program object state
    #[serde(skip)]
    pub program: PdfObject,
    #[serde(skip)]
    metrics: Option<TrueTypeMetrics>,
    #[serde(skip)]
    raw_length: usize,
    #[serde(skip)]
    base_font: Option<String>,
}

impl FontFile {
    /// Create a font file entry.
    pub fn new(name: impl Into<String>, source: ResourceSource) -> Self {
        Self {
            name: name.into(),
            source,
            descriptor: PdfObject::default(),
            program: PdfObject::default(),
            metrics: None,
            raw_length: 0,
            base_font: None,
        }
    }

    /// Metrics read during embedding.
    pub fn metrics(&self) -> Option<&TrueTypeMetrics> {
        self.metrics.as_ref()
    }

    /// Load the font program and read its metrics.
    pub fn embed(&mut self) -> Result<()> {
        let data = self.source.load()?;
        self.metrics = Some(TrueTypeMetrics::parse(&data)?);
        self.raw_length = data.len();
        log::debug!("embedded font file '{}' ({} bytes)", self.name, data.len());
        self.program.set_payload(data);
        Ok(())
    }

    /// Compress the font program if requested.
    pub fn prepare(&mut self, compress: bool) -> Result<()> {
        self.program.prepare(compress)
    }

    /// Name the descriptor is written under; must match the `/BaseFont`
    /// of the face using this file.
    pub fn set_base_font(&mut self, base_font: impl Into<String>) {
        self.base_font = Some(base_font.into());
    }

    fn font_name(&self) -> String {
        self.base_font
            .clone()
            .or_else(|| self.metrics.as_ref().and_then(|m| m.postscript_name.clone()))
            .unwrap_or_else(|| self.name.replace(' ', ""))
    }

    /// Descriptor dictionary; valid once numbers are assigned.
    pub fn descriptor_dictionary(&self) -> Result<Dictionary> {
        let metrics = self
            .metrics
            .as_ref()
            .ok_or_else(|| Error::Font(format!("font file '{}' was not embedded", self.name)))?;
        let [llx, lly, urx, ury] = metrics.bbox;
        let mut dict = Dictionary::new();
        dict.insert("Type", PdfValue::name("FontDescriptor"))
            .insert("FontName", PdfValue::Name(self.font_name()))
            .insert("Flags", PdfValue::Integer(metrics.flags as i64))
            .insert("FontBBox", PdfValue::rect(llx as i64, lly as i64, urx as i64, ury as i64))
            .insert("ItalicAngle", PdfValue::Integer(metrics.italic_angle() as i64))
            .insert("Ascent", PdfValue::Integer(metrics.ascent as i64))
            .insert("Descent", PdfValue::Integer(metrics.descent as i64))
            .insert("CapHeight", PdfValue::Integer(metrics.cap_height as i64))
            .insert("StemV", PdfValue::Integer(metrics.stem_v as i64))
            .insert("FontFile2", self.program.reference());
        Ok(dict)
    }

    /// Write the descriptor followed by the font program.
    pub fn publish<W: Write>(&mut self, w: &mut CountingWriter<W>) -> Result<()> {
        let descriptor = self.descriptor_dictionary()?;
        self.descriptor.publish(w, descriptor)?;
        let program = Dictionary::new().with("Length1", PdfValue::Integer(self.raw_length as i64));
        self.program.publish(w, program)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::object_serializer::ObjectSerializer;

    fn helvetica() -> Vec<Font> {
        Font::standard_family("Helvetica").unwrap()
    }

    #[test]
    fn test_string_width() {
        let fonts = helvetica();
        assert_eq!(fonts[0].string_width("This is test text", 10), 66);
        assert_eq!(fonts[0].string_width("", 10), 0);
    }

    #[test]
    fn test_find_exact_variant() {
        let fonts = helvetica();
        let (index, font) = find_variant(&fonts, "Helvetica", true, true).unwrap();
        assert_eq!(index, 3);
        assert_eq!(font.base_font, "Helvetica-BoldOblique");
    }

    #[test]
    fn test_find_variant_falls_back_to_regular() {
        let fonts = vec![
            Font::new("Times", "Times-Bold").with_style(true, false),
            Font::new("Times", "Times-Roman"),
        ];
        let (index, font) = find_variant(&fonts, "Times", false, true).unwrap();
        assert_eq!(index, 1);
        assert_eq!(font.base_font, "Times-Roman");
    }

    #[test]
    fn test_find_variant_falls_back_to_first_face() {
        let fonts = vec![Font::new("Courier", "Courier-Bold").with_style(true, false)];
        let (index, _) = find_variant(&fonts, "Courier", false, true).unwrap();
        assert_eq!(index, 0);
    }

    #[test]
    fn test_find_variant_unknown_family() {
        let fonts = helvetica();
        assert!(matches!(
            find_variant(&fonts, "Garamond", false, false),
            Err(Error::FontNotFound(name)) if name == "Garamond"
        ));
    }

    #[test]
    fn test_standard_font_dictionary() {
        let font = Font::new("Helvetica", "Helvetica");
        let text = ObjectSerializer::to_string(&PdfValue::Dictionary(font.dictionary(None)));
        assert_eq!(
            text,
            "<<\n  /Type /Font\n  /Subtype /Type1\n  /BaseFont /Helvetica\n  /Encoding /WinAnsiEncoding\n>>"
        );
    }

    #[test]
    fn test_resolve_metrics_rejects_unknown_standard_font() {
        let mut font = Font::new("Fancy", "Fancy-Regular");
        assert!(matches!(font.resolve_metrics(&[]), Err(Error::Unsupported(_))));
    }

    #[test]
    fn test_resolve_metrics_requires_embedded_file() {
        let mut font = Font::new("Custom", "Custom").with_file("custom.ttf");
        assert!(matches!(font.resolve_metrics(&[]), Err(Error::FontNotFound(_))));
    }

    #[test]
    fn test_font_file_embed_rejects_garbage() {
        let mut file = FontFile::new("broken", ResourceSource::bytes(b"not a font".to_vec()));
        assert!(matches!(file.embed(), Err(Error::Font(_))));
        assert!(file.descriptor_dictionary().is_err());
    }

    const DEMO_TTF: &[u8] = include_bytes!("../../tests/fixtures/demo.ttf");

    fn demo_file() -> FontFile {
        let mut file = FontFile::new("demo", ResourceSource::bytes(DEMO_TTF.to_vec()));
        file.embed().unwrap();
        file
    }

    #[test]
    fn test_descriptor_font_name_follows_base_font() {
        let mut file = demo_file();
        // No name table in the fixture; falls back to the file name.
        let dict = file.descriptor_dictionary().unwrap();
        assert_eq!(dict.get("FontName"), Some(&PdfValue::name("demo")));

        file.set_base_font("Demo-Regular");
        let dict = file.descriptor_dictionary().unwrap();
        assert_eq!(dict.get("FontName"), Some(&PdfValue::name("Demo-Regular")));
    }

    #[test]
    fn test_embedded_face_uses_file_widths() {
        let files = vec![demo_file()];
        let mut font = Font::new("Demo", "Demo-Regular").with_file("demo");
        font.resolve_metrics(&files).unwrap();
        assert_eq!(font.char_width(b'A'), 540);
        assert_eq!(font.char_width(b'B'), 0);
        assert_eq!(font.char_width(b'\n'), 0);
        assert_eq!(font.string_units(b"AA"), 1080);
    }

    #[test]
    fn test_standard_family_faces() {
        let fonts = helvetica();
        assert_eq!(fonts.len(), 4);
        assert!(fonts.iter().all(|f| f.font_name == "Helvetica"));
        assert!(Font::standard_family("Wingdings").is_err());
        assert_eq!(font_resource_id(0), "F1");
    }
}
