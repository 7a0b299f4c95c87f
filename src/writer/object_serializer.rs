//! PDF object serialization.
//!
//! Writes [`PdfValue`] and [`Dictionary`] values in PDF syntax, counts every
//! byte that passes through the output, and deflates stream payloads.

use std::io::{self, Write};

use crate::object::{Dictionary, PdfValue};

/// Writer adapter that tracks the absolute number of bytes written.
///
/// Object offsets in the cross-reference table are read from here, never
/// computed ahead of time.
#[derive(Debug)]
pub struct CountingWriter<W: Write> {
    inner: W,
    position: u64,
}

impl<W: Write> CountingWriter<W> {
    /// Wrap a writer, starting the count at zero.
    pub fn new(inner: W) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes written so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Borrow the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.position += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Deflate a stream payload (zlib container, as `/FlateDecode` expects).
pub fn compress_data(data: &[u8]) -> io::Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    encoder.finish()
}

/// Format a number the way PDF operands are written.
///
/// Whole values print without a decimal point; anything else keeps at most
/// five decimals with trailing zeros removed.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let formatted = format!("{:.5}", value);
        let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Serializer for PDF values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Serialize a value to a string (for debugging and tests).
    pub fn to_string(value: &PdfValue) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = Self::write_value(&mut buf, value, 0);
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Write a value.
    ///
    /// `depth` is the nesting level of the dictionary the value belongs to;
    /// nested dictionaries are indented one level deeper.
    pub fn write_value<W: Write>(w: &mut W, value: &PdfValue, depth: usize) -> io::Result<()> {
        match value {
            PdfValue::Integer(i) => write!(w, "{}", i),
            PdfValue::Real(r) => write!(w, "{}", format_number(*r)),
            PdfValue::Name(n) => Self::write_name(w, n),
            PdfValue::Text(s) => Self::write_text(w, s),
            PdfValue::Raw(raw) => w.write_all(raw.as_bytes()),
            PdfValue::Reference(n) => write!(w, "{} 0 R", n),
            PdfValue::Array(items) => {
                w.write_all(b"[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        w.write_all(b" ")?;
                    }
                    Self::write_value(w, item, depth)?;
                }
                w.write_all(b"]")
            },
            PdfValue::Dictionary(dict) => Self::write_dictionary(w, dict, depth + 1),
        }
    }

    /// Write a dictionary, one `/Key value` entry per line.
    ///
    /// Entries at depth `d` are indented by `2 * d` spaces and the closing
    /// `>>` by `2 * (d - 1)`.
    pub fn write_dictionary<W: Write>(w: &mut W, dict: &Dictionary, depth: usize) -> io::Result<()> {
        let entry_indent = " ".repeat(depth * 2);
        let close_indent = " ".repeat(depth.saturating_sub(1) * 2);

        w.write_all(b"<<\n")?;
        for (key, value) in dict.iter() {
            w.write_all(entry_indent.as_bytes())?;
            Self::write_name(w, key)?;
            w.write_all(b" ")?;
            Self::write_value(w, value, depth)?;
            w.write_all(b"\n")?;
        }
        w.write_all(close_indent.as_bytes())?;
        w.write_all(b">>")
    }

    /// Write a PDF name.
    ///
    /// Names start with `/` and escape delimiters and non-regular bytes as `#xx`.
    pub fn write_name<W: Write>(w: &mut W, name: &str) -> io::Result<()> {
        w.write_all(b"/")?;
        for byte in name.bytes() {
            match byte {
                b'!'
                | b'"'
                | b'$'..=b'&'
                | b'\''
                | b'*'..=b'.'
                | b'0'..=b'9'
                | b';'
                | b'='
                | b'?'
                | b'@'
                | b'A'..=b'Z'
                | b'^'..=b'z'
                | b'|'
                | b'~' => w.write_all(&[byte])?,
                _ => write!(w, "#{:02X}", byte)?,
            }
        }
        Ok(())
    }

    /// Write a text string.
    ///
    /// Printable ASCII becomes an escaped literal `(...)`. Anything else is
    /// written as a UTF-16BE hex string with a byte order mark.
    pub fn write_text<W: Write>(w: &mut W, text: &str) -> io::Result<()> {
        let printable = text.bytes().all(|b| (0x20..=0x7E).contains(&b));
        if printable {
            w.write_all(b"(")?;
            w.write_all(&escape_literal(text.as_bytes()))?;
            w.write_all(b")")
        } else {
            w.write_all(b"<FEFF")?;
            for unit in text.encode_utf16() {
                write!(w, "{:04X}", unit)?;
            }
            w.write_all(b">")
        }
    }
}

/// Escape bytes for use inside a literal string.
pub fn escape_literal(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for &byte in data {
        match byte {
            b'(' => out.extend_from_slice(b"\\("),
            b')' => out.extend_from_slice(b"\\)"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            _ => out.push(byte),
        }
    }
    out
}
